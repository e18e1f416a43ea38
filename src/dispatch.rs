use std::process::Command;

use crate::cli::{Invocation, Mode};
use crate::resolve::ResolvedIdentifiers;
use crate::substitute;

/// Binary dispatched when no --command override is given.
pub const DEFAULT_BINARY: &str = "aws";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Please make sure \"{0}\" is installed and available in the PATH")]
    Launch(String),

    #[error(transparent)]
    Substitution(#[from] substitute::Error),

    #[error("No command to run")]
    Empty,
}

/// Assemble the final argument vector with placeholders substituted. In
/// default mode the aws CLI leads the vector and --region/--profile are
/// appended so the child sees them too; an override command is dispatched
/// exactly as given.
pub fn build_command(
    invocation: &Invocation,
    ids: &ResolvedIdentifiers,
) -> Result<Vec<String>, Error> {
    let mut command = match &invocation.mode {
        Mode::Override(tokens) => tokens.clone(),
        Mode::Aws => vec![DEFAULT_BINARY.to_string()],
    };
    command.extend(invocation.forwarded.iter().cloned());

    if let Mode::Aws = invocation.mode {
        if let Some(region) = &invocation.region {
            command.push(String::from("--region"));
            command.push(region.clone());
        }
        if let Some(profile) = &invocation.profile {
            command.push(String::from("--profile"));
            command.push(profile.clone());
        }
    }

    let command = substitute::substitute_all(&command, ids)?;
    if command.is_empty() {
        return Err(Error::Empty);
    }

    return Ok(command);
}

/// Run the assembled command and relay its exit code. A child killed
/// without an exit code maps to 1.
pub fn run(command: &[String]) -> Result<i32, Error> {
    let status = match Command::new(&command[0]).args(&command[1..]).status() {
        Ok(status) => status,
        Err(_) => return Err(Error::Launch(command[0].clone())),
    };

    return Ok(status.code().unwrap_or(1));
}

#[cfg(test)]
mod tests {
    use super::build_command;
    use super::run;
    use super::Error;
    use crate::cli::{Echo, Invocation, Mode, StackSelection};
    use crate::resolve::ResolvedIdentifiers;
    use crate::substitute;

    fn ids(entries: &[(&str, &str)]) -> ResolvedIdentifiers {
        return entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
    }

    fn invocation(forwarded: &[&str]) -> Invocation {
        return Invocation {
            stack: StackSelection::Named(String::from("teststack")),
            region: None,
            profile: None,
            mode: Mode::Aws,
            forwarded: forwarded.iter().map(|token| token.to_string()).collect(),
            echo: Echo::Quiet,
        };
    }

    #[test]
    fn default_mode_dispatches_through_aws() {
        let invocation = invocation(&["cf:DeploymentBucket:", "test2", "test3"]);
        let mapping = ids(&[("DeploymentBucket", "1")]);

        let command = build_command(&invocation, &mapping).unwrap();
        assert_eq!(vec!["aws", "1", "test2", "test3"], command);
    }

    #[test]
    fn default_mode_appends_region_and_profile() {
        let mut invocation = invocation(&["cf:DeploymentBucket:"]);
        invocation.region = Some(String::from("region"));
        invocation.profile = Some(String::from("profile"));
        let mapping = ids(&[("DeploymentBucket", "1")]);

        let command = build_command(&invocation, &mapping).unwrap();
        assert_eq!(
            vec!["aws", "1", "--region", "region", "--profile", "profile"],
            command
        );
    }

    #[test]
    fn override_mode_appends_nothing() {
        let mut invocation = invocation(&[]);
        invocation.mode = Mode::Override(vec![
            String::from("testcommand"),
            String::from("cf:DeploymentBucket:"),
        ]);
        invocation.region = Some(String::from("test"));
        let mapping = ids(&[("DeploymentBucket", "1")]);

        let command = build_command(&invocation, &mapping).unwrap();
        assert_eq!(vec!["testcommand", "1"], command);
    }

    #[test]
    fn unresolved_placeholder_fails_before_dispatch() {
        let invocation = invocation(&["cf:DeploymentBucket:"]);

        let result = build_command(&invocation, &ids(&[]));
        assert_eq!(
            Err(Error::Substitution(substitute::Error::UnknownId(
                String::from("DeploymentBucket")
            ))),
            result
        );
    }

    #[test]
    fn empty_override_command_fails() {
        let mut invocation = invocation(&[]);
        invocation.mode = Mode::Override(vec![]);

        let result = build_command(&invocation, &ids(&[]));
        assert_eq!(Err(Error::Empty), result);
    }

    #[test]
    fn missing_binary_fails_with_a_hint() {
        let command = vec![String::from("cfn-sub-test-no-such-binary")];
        let result = run(&command);
        assert_eq!(
            Err(Error::Launch(String::from("cfn-sub-test-no-such-binary"))),
            result
        );
    }

    #[cfg(unix)]
    #[test]
    fn relays_the_child_exit_code() {
        let command = vec![
            String::from("sh"),
            String::from("-c"),
            String::from("exit 7"),
        ];
        assert_eq!(7, run(&command).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn successful_child_exits_zero() {
        let command = vec![String::from("true")];
        assert_eq!(0, run(&command).unwrap());
    }
}
