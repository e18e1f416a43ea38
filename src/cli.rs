use clap::Parser;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Flag {0} expects a value")]
    MissingValue(String),
}

/// Call a command with CloudFormation values substituted into its arguments.
///
/// The first positional argument is the stack to resolve values from, or the
/// path of a config file naming it. All other arguments are forwarded to the
/// dispatched command (the aws CLI unless --command is given) after every
/// cf:Name: placeholder is replaced with the resolved value.
///
/// Example: cfn-sub example-stack s3 ls s3://cf:DeploymentBucket:
#[derive(Parser, Debug)]
#[command(name = "cfn-sub", version)]
pub struct Args {
    /// Stack to load resources from, or path of a config file naming it
    pub stack: String,

    /// The AWS region to use
    #[arg(long)]
    pub region: Option<String>,

    /// The AWS profile to use
    #[arg(long)]
    pub profile: Option<String>,

    /// Run the given command line instead of the aws CLI
    #[arg(long)]
    pub command: Option<String>,

    /// Resolve only exported values, no stack data
    #[arg(long)]
    pub no_stack: bool,

    /// Print resolved values and the final command before running it
    #[arg(long)]
    pub verbose: bool,

    /// Like --verbose, but don't run the command
    #[arg(long)]
    pub debug: bool,

    /// Arguments forwarded to the dispatched command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub forwarded: Vec<String>,
}

/// How the final argument vector is assembled.
#[derive(Debug, PartialEq)]
pub enum Mode {
    /// Prepend the aws CLI binary and append --region/--profile.
    Aws,
    /// Dispatch the given tokens, nothing auto-appended.
    Override(Vec<String>),
}

/// Which lookups the resolver performs.
#[derive(Debug, PartialEq)]
pub enum StackSelection {
    /// Stack name or config file path, settled by the config loader.
    Named(String),
    /// --no-stack: account exports only.
    ExportsOnly,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Echo {
    Quiet,
    /// --verbose: dump replacements and the final command.
    Verbose,
    /// --debug: dump like --verbose but skip running the command.
    DryRun,
}

/// The fully normalized command line. Built once; downstream code reads the
/// tags here instead of re-deriving behavior from raw flags.
#[derive(Debug, PartialEq)]
pub struct Invocation {
    pub stack: StackSelection,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub mode: Mode,
    pub forwarded: Vec<String>,
    pub echo: Echo,
}

impl Invocation {
    pub fn from_args(args: Args) -> Result<Self, Error> {
        let mut region = args.region;
        let mut profile = args.profile;
        let mut command = args.command;
        let mut no_stack = args.no_stack;
        let mut verbose = args.verbose;
        let mut debug = args.debug;

        // Recognized flags may trail the forwarded tokens, where clap hands
        // them to us verbatim. Lift them out so only genuinely pass-through
        // tokens remain.
        let mut forwarded = Vec::new();
        let mut tokens = args.forwarded.into_iter();
        while let Some(token) = tokens.next() {
            match token.as_str() {
                "--region" => region = Some(take_value(&token, &mut tokens)?),
                "--profile" => profile = Some(take_value(&token, &mut tokens)?),
                "--command" => command = Some(take_value(&token, &mut tokens)?),
                "--no-stack" => no_stack = true,
                "--verbose" => verbose = true,
                "--debug" => debug = true,
                _ => match token.split_once('=') {
                    Some(("--region", value)) => region = Some(value.to_string()),
                    Some(("--profile", value)) => profile = Some(value.to_string()),
                    Some(("--command", value)) => command = Some(value.to_string()),
                    _ => forwarded.push(token),
                },
            }
        }

        let stack = if no_stack {
            // The positional slot becomes the first forwarded token.
            forwarded.insert(0, args.stack);
            StackSelection::ExportsOnly
        } else {
            StackSelection::Named(args.stack)
        };

        let mode = match command {
            Some(line) => Mode::Override(line.split_whitespace().map(str::to_string).collect()),
            None => Mode::Aws,
        };

        let echo = if debug {
            Echo::DryRun
        } else if verbose {
            Echo::Verbose
        } else {
            Echo::Quiet
        };

        return Ok(Invocation {
            stack,
            region,
            profile,
            mode,
            forwarded,
            echo,
        });
    }
}

fn take_value(
    flag: &str,
    tokens: &mut impl Iterator<Item = String>,
) -> Result<String, Error> {
    match tokens.next() {
        Some(value) => Ok(value),
        None => Err(Error::MissingValue(flag.to_string())),
    }
}
