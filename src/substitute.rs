use crate::resolve::ResolvedIdentifiers;

const PREFIX: &str = "cf:";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("Resource with logical ID \"{0}\" does not exist")]
    UnknownId(String),
}

/// Replace every `cf:Name:` placeholder in `argument` with its resolved
/// value. A name is one or more alphanumeric-or-hyphen segments separated by
/// single colons; the colon after the last segment terminates the
/// placeholder. The longest such name wins, so `cf:A:B:C::tail` resolves
/// `A:B:C` and leaves `:tail` untouched. A `cf:` with no terminated name
/// after it is left alone.
pub fn substitute(argument: &str, ids: &ResolvedIdentifiers) -> Result<String, Error> {
    let mut output = String::with_capacity(argument.len());
    let mut rest = argument;

    while let Some(start) = rest.find(PREFIX) {
        let after_prefix = &rest[start + PREFIX.len()..];
        match scan_name(after_prefix) {
            Some(name) => {
                output.push_str(&rest[..start]);
                match ids.get(name) {
                    Some(value) if !value.is_empty() => output.push_str(value),
                    _ => return Err(Error::UnknownId(name.to_string())),
                }
                // step over the name and its terminating colon
                rest = &after_prefix[name.len() + 1..];
            }
            None => {
                output.push_str(&rest[..start + PREFIX.len()]);
                rest = after_prefix;
            }
        }
    }

    output.push_str(rest);
    return Ok(output);
}

pub fn substitute_all(
    arguments: &[String],
    ids: &ResolvedIdentifiers,
) -> Result<Vec<String>, Error> {
    let mut substituted = Vec::with_capacity(arguments.len());
    for argument in arguments {
        substituted.push(substitute(argument, ids)?);
    }
    return Ok(substituted);
}

/// Longest prefix of `input` that forms segments separated by single colons
/// and is followed by one more colon. Returns the name without that
/// terminator, or `None` when no terminated name starts here.
fn scan_name(input: &str) -> Option<&str> {
    let bytes = input.as_bytes();
    let mut end = None;
    let mut position = 0;

    loop {
        let segment_start = position;
        while position < bytes.len() && is_name_byte(bytes[position]) {
            position += 1;
        }
        if position == segment_start {
            break;
        }
        if position < bytes.len() && bytes[position] == b':' {
            // Terminator candidate; keep going in case another segment
            // extends the name.
            end = Some(position);
            position += 1;
        } else {
            break;
        }
    }

    return end.map(|end| &input[..end]);
}

fn is_name_byte(byte: u8) -> bool {
    return byte.is_ascii_alphanumeric() || byte == b'-';
}

#[cfg(test)]
mod tests {
    use super::substitute;
    use super::substitute_all;
    use super::Error;
    use crate::resolve::ResolvedIdentifiers;

    fn ids(entries: &[(&str, &str)]) -> ResolvedIdentifiers {
        return entries
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
    }

    #[test]
    fn argument_without_placeholder_is_unchanged() {
        let result = substitute("s3://plain-bucket/key", &ids(&[]));
        assert_eq!("s3://plain-bucket/key", result.unwrap());
    }

    #[test]
    fn replaces_a_whole_argument() {
        let mapping = ids(&[("DeploymentBucket", "1")]);
        assert_eq!("1", substitute("cf:DeploymentBucket:", &mapping).unwrap());
    }

    #[test]
    fn replaces_an_embedded_placeholder() {
        let mapping = ids(&[("DeploymentBucket", "bucket-1234")]);
        assert_eq!(
            "s3://bucket-1234/key",
            substitute("s3://cf:DeploymentBucket:/key", &mapping).unwrap()
        );
    }

    #[test]
    fn replaces_multiple_placeholders() {
        let mapping = ids(&[("Source", "a"), ("Target", "b")]);
        assert_eq!(
            "a->b",
            substitute("cf:Source:->cf:Target:", &mapping).unwrap()
        );
    }

    #[test]
    fn name_may_contain_colons_and_hyphens() {
        let mapping = ids(&[("my-stack:Bucket", "named")]);
        assert_eq!("named", substitute("cf:my-stack:Bucket:", &mapping).unwrap());
    }

    #[test]
    fn double_colon_terminates_the_name() {
        let mapping = ids(&[("A:B:C", "Replace")]);
        assert_eq!(
            "Replace:12345_12345:",
            substitute("cf:A:B:C::12345_12345:", &mapping).unwrap()
        );
    }

    #[test]
    fn unterminated_placeholder_is_literal() {
        let result = substitute("cf:DeploymentBucket", &ids(&[]));
        assert_eq!("cf:DeploymentBucket", result.unwrap());
    }

    #[test]
    fn unknown_name_fails() {
        let result = substitute("cf:Missing:", &ids(&[]));
        assert_eq!(Err(Error::UnknownId(String::from("Missing"))), result);
    }

    #[test]
    fn empty_value_fails() {
        let mapping = ids(&[("Empty", "")]);
        let result = substitute("cf:Empty:", &mapping);
        assert_eq!(Err(Error::UnknownId(String::from("Empty"))), result);
    }

    #[test]
    fn replacement_is_not_rescanned() {
        let mapping = ids(&[("Outer", "cf:Inner:")]);
        assert_eq!("cf:Inner:", substitute("cf:Outer:", &mapping).unwrap());
    }

    #[test]
    fn substitutes_each_argument_independently() {
        let mapping = ids(&[("DeploymentBucket", "1")]);
        let arguments = vec![
            String::from("cf:DeploymentBucket:"),
            String::from("test2"),
            String::from("test3"),
        ];

        let substituted = substitute_all(&arguments, &mapping).unwrap();
        assert_eq!(vec!["1", "test2", "test3"], substituted);
    }
}
