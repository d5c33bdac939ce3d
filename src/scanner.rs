//! Line scanner for archive files.
//!
//! Archive files interleave `%` comment lines with tab separated solution rows.
//! Each instance block opens with a comment line carrying `instance = <n>` and
//! has no closing marker, so a block ends at the first comment line that
//! follows its data, or at another instance's marker if it has no data.

use crate::MergeError;

pub const COMMENT_MARKER: char = '%';
const INSTANCE_KEY: &str = "instance";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Looking for the marker of the requested instance.
    Searching,
    /// Inside the requested block. `started` flips once the first data line is seen.
    Collecting { started: bool },
    /// Block finished; nothing else in the file is read.
    Done,
}

/// One data line of the requested instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolutionLine<'a> {
    pub value1: &'a str,
    pub value2: &'a str,
    pub raw: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAction<'a> {
    Skip,
    Emit(SolutionLine<'a>),
}

/// Advance the scanner by one line.
///
/// `line` may still carry its line terminator; the emitted `raw` text keeps it
/// so that archives can write lines back out verbatim.
pub fn step<'a>(
    state: ScanState,
    line: &'a str,
    instance: u32,
) -> Result<(ScanState, ScanAction<'a>), MergeError> {
    let content = line.trim_end_matches(['\n', '\r']);
    if content.is_empty() {
        return Ok((state, ScanAction::Skip));
    }
    let is_comment = content.starts_with(COMMENT_MARKER);

    match state {
        ScanState::Done => Ok((ScanState::Done, ScanAction::Skip)),
        ScanState::Searching => {
            if is_comment && marker_instance(&content[1..])? == Some(instance) {
                Ok((ScanState::Collecting { started: false }, ScanAction::Skip))
            } else {
                Ok((ScanState::Searching, ScanAction::Skip))
            }
        }
        ScanState::Collecting { started } => {
            if is_comment {
                let other_block = matches!(marker_instance(&content[1..])?, Some(found) if found != instance);
                let next = if started || other_block {
                    ScanState::Done
                } else {
                    ScanState::Collecting { started: false }
                };
                return Ok((next, ScanAction::Skip));
            }
            let solution = split_solution(content, line)?;
            Ok((ScanState::Collecting { started: true }, ScanAction::Emit(solution)))
        }
    }
}

/// Instance number carried by a marker comment, `None` for any other comment.
fn marker_instance(comment: &str) -> Result<Option<u32>, MergeError> {
    if !comment.contains(INSTANCE_KEY) {
        return Ok(None);
    }
    match get_key_value(comment, INSTANCE_KEY) {
        Some(value) => value
            .parse::<u32>()
            .map(Some)
            .map_err(|e| MergeError::Parse(format!("invalid instance value '{}': {}", value, e))),
        None => Ok(None),
    }
}

fn split_solution<'a>(content: &'a str, raw: &'a str) -> Result<SolutionLine<'a>, MergeError> {
    let mut fields = content.split('\t');
    let _evaluation = fields.next();
    match (fields.next(), fields.next()) {
        (Some(value1), Some(value2)) => Ok(SolutionLine { value1, value2, raw }),
        _ => Err(MergeError::Parse(format!(
            "solution line has fewer than 3 tab separated fields: '{}'",
            content
        ))),
    }
}

/// Value of `key` in a comma separated list of `key = value` pairs.
///
/// `get_key_value("instance = 2, name = bbob", "name") == Some("bbob")`
pub fn get_key_value<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    text.split(',')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| k.trim() == key)
        .map(|(_, v)| v.trim())
}
