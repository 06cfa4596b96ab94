use crate::error::{self, Result};
use agent_utils::impl_display_as_json;
use provisioner::Configuration;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use snafu::ResultExt;
use std::collections::BTreeMap;

/// What a successful apply produced: the value of every terraform output.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedInfrastructure {
    pub outputs: BTreeMap<String, Value>,
}

impl Configuration for AppliedInfrastructure {}
impl_display_as_json!(AppliedInfrastructure);

impl AppliedInfrastructure {
    pub fn output(&self, name: &str) -> Option<&Value> {
        self.outputs.get(name)
    }

    /// The output `name` if it is a string.
    pub fn output_string(&self, name: &str) -> Option<&str> {
        self.output(name).and_then(Value::as_str)
    }
}

/// An entry of `terraform output -json`.
#[derive(Deserialize)]
struct OutputValue {
    value: Value,
}

/// Parses the stdout of `terraform output -json` into a map of output names to values.
pub(crate) fn parse_outputs(stdout: &str) -> Result<BTreeMap<String, Value>> {
    // Older terraform versions print nothing when there are no outputs.
    if stdout.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let outputs: BTreeMap<String, OutputValue> =
        serde_json::from_str(stdout).context(error::OutputParseSnafu)?;
    Ok(outputs
        .into_iter()
        .map(|(name, output)| (name, output.value))
        .collect())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn outputs() {
        let stdout = r#"{
  "cluster_id": {"sensitive": false, "type": "string", "value": "j-2AXXXXXXGAPLF"},
  "core_instance_count": {"sensitive": false, "type": "number", "value": 2}
}"#;
        let applied = AppliedInfrastructure {
            outputs: parse_outputs(stdout).unwrap(),
        };
        assert_eq!(applied.output_string("cluster_id"), Some("j-2AXXXXXXGAPLF"));
        assert_eq!(applied.output("core_instance_count"), Some(&Value::from(2)));
        assert_eq!(applied.output_string("core_instance_count"), None);
        assert_eq!(applied.output("missing"), None);
    }

    #[test]
    fn no_outputs() {
        assert!(parse_outputs("").unwrap().is_empty());
        assert!(parse_outputs("{}\n").unwrap().is_empty());
        assert!(parse_outputs("Error: not json").is_err());
    }
}
