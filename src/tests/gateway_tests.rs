use std::sync::Arc;

use crate::implementations::gateway::OracleGateway;
use crate::models::conversation::{ ExpectedOutput, Role };
use crate::traits::oracle::OracleError;

use super::support::{ member_entity, setup, ScriptedOracle };

#[tokio::test]
async fn explanatory_reply_triggers_stricter_retry() {
    setup();
    let oracle = Arc::new(
        ScriptedOracle::replying(&["I cannot provide this without seeing more context.", &member_entity()])
    );
    let gateway = OracleGateway::with_limits(oracle.clone(), 10_000, 3);

    let reply = gateway.query("Migrate Member", "sys", &ExpectedOutput::java()).await;

    let reply = reply.expect("second attempt should be accepted");
    assert!(reply.starts_with("package org.jboss.as.quickstarts.kitchensink.model;"));
    assert!(reply.contains("public class Member"));
    assert_eq!(oracle.calls(), 2);

    let retry = &oracle.conversations()[1];
    assert_eq!(retry[0].role, Role::System);
    assert!(retry.iter().any(|m| m.role == Role::Assistant && m.content.starts_with("I cannot provide")));
    let last = retry.last().unwrap();
    assert_eq!(last.role, Role::User);
    assert!(last.content.contains("IMPORTANT: Respond with ONLY"));
    assert!(last.content.contains("Migrate Member"));
}

#[tokio::test]
async fn oracle_errors_consume_attempts() {
    setup();
    let oracle = Arc::new(
        ScriptedOracle::new(
            vec![
                Err(OracleError::NetworkError("connection reset".to_string())),
                Err(OracleError::HttpError { status: 529, message: "overloaded".to_string() }),
                Ok(member_entity())
            ]
        )
    );
    let gateway = OracleGateway::with_limits(oracle.clone(), 10_000, 2);

    assert_eq!(gateway.query("Migrate Member", "sys", &ExpectedOutput::java()).await, None);
    assert_eq!(oracle.calls(), 2);
}

#[tokio::test]
async fn oversized_prompt_is_condensed_before_sending() {
    setup();
    let mut source = String::from("package a.b;\nimport x.Y;\npublic class Big {\n");
    for i in 0..400 {
        source.push_str(&format!("    public void method{}(int value) {{ call(value); }}\n", i));
    }
    source.push_str("}\n");
    let prompt = format!("Migrate this class:\n\n```java\n{}```\n\nOnly code.", source);

    let oracle = Arc::new(ScriptedOracle::replying(&[&member_entity()]));
    let gateway = OracleGateway::with_limits(oracle.clone(), 2_000, 1);
    assert!(gateway.query(&prompt, "sys", &ExpectedOutput::java()).await.is_some());

    let sent = &oracle.conversations()[0][1].content;
    assert!(sent.len() < prompt.len());
    assert!(sent.contains("// --- Method signatures ---"));
    assert!(sent.starts_with("Migrate this class:"));
}

#[tokio::test]
async fn oversized_prompt_without_code_is_truncated() {
    setup();
    let prompt = "x".repeat(500);
    let oracle = Arc::new(ScriptedOracle::replying(&["{\"analysis\": \"ok\"}"]));
    let gateway = OracleGateway::with_limits(oracle.clone(), 100, 1);

    assert_eq!(
        gateway.query(&prompt, "sys", &ExpectedOutput::Json).await.as_deref(),
        Some("{\"analysis\": \"ok\"}")
    );
    let sent = &oracle.conversations()[0][1].content;
    assert!(sent.starts_with(&"x".repeat(100)));
    assert!(sent.ends_with("[Content truncated due to length]"));
}
