use serde::Deserialize;
use std::{fs, io, path::Path};
use validator::Validate;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("File {0} not found")]
    FileNotFound(String),

    #[error("Parsing error: {0}")]
    ParsingError(String),

    #[error("Config file does not contain stack option")]
    MissingStack,

    #[error("Unknown error occurred: {0}")]
    Unknown(String),
}

/// On-disk stack reference: a YAML document naming the stack to resolve
/// against, with an optional region override for the lookup session.
#[derive(Debug, Deserialize, Validate)]
pub struct StackConfig {
    #[validate(required, length(min = 1))]
    pub stack: Option<String>,

    pub region: Option<String>,
}

pub fn parse(path: &Path) -> Result<StackConfig, Error> {
    let contents = match fs::read_to_string(path) {
        Ok(raw_contents) => Ok(raw_contents),
        Err(error) => match error.kind() {
            io::ErrorKind::NotFound => Err(Error::FileNotFound(path.display().to_string())),
            _ => Err(Error::Unknown(error.to_string())),
        },
    }?;

    let config: StackConfig = match serde_yaml::from_str(&contents) {
        Ok(data) => Ok(data),
        Err(error) => Err(Error::ParsingError(error.to_string())),
    }?;

    match config.validate() {
        Ok(_) => (),
        Err(_) => return Err(Error::MissingStack),
    }

    return Ok(config);
}

/// Settle the positional argument into the stack name used for resolution.
/// A value naming an existing file is read as a config document; anything
/// else is taken as a literal stack name.
pub fn effective_stack(argument: &str) -> Result<(String, Option<String>), Error> {
    let path = Path::new(argument);
    if !path.is_file() {
        return Ok((argument.to_string(), None));
    }

    let config = parse(path)?;
    let stack = match config.stack {
        Some(stack) => stack,
        None => return Err(Error::MissingStack),
    };

    return Ok((stack, config.region));
}
