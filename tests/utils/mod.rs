#![allow(dead_code)]

use firebase_remote_config::Client;

pub const MOCK_PROJECT: &str = "demo-project";
pub const MOCK_PATH: &str =
    "/v1/projects/demo-project/namespaces/firebase-server/serverRemoteConfig";

pub fn client_for(url: &str) -> Client {
    Client::builder(MOCK_PROJECT).base_url(url).build().unwrap()
}

/// A condition that matches every context carrying a string randomization id.
pub fn always_on_condition(name: &str) -> String {
    format!(
        r#"{{"name": "{name}", "condition": {{"percent": {{"percentOperator": "BETWEEN", "microPercentRange": {{"microPercentLowerBound": 0, "microPercentUpperBound": 100000000}}}}}}}}"#
    )
}

pub fn construct_template_payload(conditions: &[String], parameters: &str) -> String {
    format!(
        r#"{{"conditions": [{conditions}], "parameters": {parameters}}}"#,
        conditions = conditions.join(", ")
    )
}

pub fn construct_string_parameter(key: &str, value: &str) -> String {
    format!(r#""{key}": {{"defaultValue": {{"value": "{value}"}}}}"#)
}
