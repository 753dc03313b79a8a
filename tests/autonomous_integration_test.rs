//! End-to-end tests of the autonomous service over mock collaborators.
//!
//! These exercise the full dispatch path: target resolution, language
//! derivation, strategy selection per channel, fallback engagement and
//! report aggregation.

mod common;

use std::sync::atomic::Ordering;

use serde_json::json;

use lureforge::domain::models::ChannelKind;

use common::{reply, user_request, ServiceFixture, StubResolver};

#[tokio::test]
async fn tool_first_path_never_touches_the_agent() {
    let fixture = ServiceFixture::tool_first(StubResolver::user("u-1", Some("de-DE")));
    let svc = fixture.build();

    let report = svc
        .run(&user_request(vec![
            ChannelKind::Phishing,
            ChannelKind::Smishing,
        ]))
        .await;

    assert!(report.success);
    let phishing = report.phishing_result.as_ref().unwrap();
    assert!(phishing.message.as_ref().unwrap().contains("deterministic tools"));
    assert_eq!(phishing.data.as_ref().unwrap()["contentId"], json!("phish-1"));
    assert_eq!(
        report.smishing_result.as_ref().unwrap().data.as_ref().unwrap()["contentId"],
        json!("smish-1")
    );
    // No conversational turn of any kind was issued.
    assert_eq!(fixture.conversation.calls.load(Ordering::SeqCst), 0);
    // Both assignments reached the resolved user.
    let seen = fixture.assigner.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen
        .iter()
        .all(|a| a.target_user_resource_id.as_deref() == Some("u-1")));
}

#[tokio::test]
async fn failed_tool_generation_engages_the_conversational_chain() {
    let mut fixture = ServiceFixture::tool_first(StubResolver::user("u-1", None));
    fixture.phishing_generator = common::CountingGenerator::failing("phishingId");
    fixture.conversation = common::ScriptedConversation::new(vec![
        reply(r#"Done, created "phishingId": "conv-7""#),
        reply("stopped"),
        reply("stopped"),
    ]);
    let svc = fixture.build();

    let report = svc.run(&user_request(vec![ChannelKind::Phishing])).await;

    assert!(report.success);
    let result = report.phishing_result.unwrap();
    assert!(result.message.as_ref().unwrap().contains("conversational level 1"));
    assert_eq!(result.data.as_ref().unwrap()["contentId"], json!("conv-7"));
    assert!(result.agent_response.is_some());
    // The deterministic generator was retried exactly once before falling
    // back: two tool attempts, then the conversational turn plus two stops.
    assert_eq!(fixture.phishing_generator.calls.load(Ordering::SeqCst), 2);
    assert_eq!(fixture.conversation.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn group_target_is_assigned_as_a_group() {
    let fixture = ServiceFixture::tool_first(StubResolver::group("g-9"));
    let svc = fixture.build();

    let mut request = user_request(vec![ChannelKind::Training]);
    request.target_user_resource_id = None;
    request.target_group_resource_id = Some("g-9".into());

    let report = svc.run(&request).await;

    assert!(report.success);
    let seen = fixture.assigner.seen.lock().unwrap();
    assert_eq!(seen[0].target_group_resource_id.as_deref(), Some("g-9"));
    assert_eq!(seen[0].target_user_resource_id, None);
}

#[tokio::test]
async fn vishing_generates_a_scenario_and_places_the_call() {
    let mut fixture = ServiceFixture::tool_first(StubResolver::user("u-1", None));
    fixture.resolver = std::sync::Arc::new(StubResolver {
        phone: Some("+15551234567".into()),
        ..StubResolver::user("u-1", None)
    });
    fixture.conversation = common::ScriptedConversation::new(vec![
        reply(
            r#"```json
{"persona": "IT helpdesk", "pretext": "password audit", "opening_line": "Hi, this is IT."}
```"#,
        ),
        reply("stopped"),
    ]);
    let svc = fixture.build();

    let report = svc.run(&user_request(vec![ChannelKind::Vishing])).await;

    assert!(report.success);
    let result = report.vishing_call_result.unwrap();
    assert!(result.success);
    assert_eq!(result.data.as_ref().unwrap()["callId"], json!("call-42"));

    let placed = fixture.telephony.placed.lock().unwrap();
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0].destination, "+15551234567");
    assert_eq!(placed[0].from_number, "+15550001111");
    assert!(placed[0].first_message.contains("Hi, this is IT."));
}

#[tokio::test]
async fn vishing_without_a_phone_number_fails_before_any_call() {
    let fixture = ServiceFixture::tool_first(StubResolver::user("u-1", None));
    let svc = fixture.build();

    let report = svc.run(&user_request(vec![ChannelKind::Vishing])).await;

    assert!(!report.success);
    let result = report.vishing_call_result.unwrap();
    assert!(result.error.as_ref().unwrap().contains("No phone number"));
    assert!(fixture.telephony.placed.lock().unwrap().is_empty());
    assert_eq!(fixture.conversation.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn quishing_flag_from_upload_reaches_the_report() {
    let mut fixture = ServiceFixture::tool_first(StubResolver::user("u-1", None));
    fixture.is_quishing = Some(true);
    let svc = fixture.build();

    let report = svc.run(&user_request(vec![ChannelKind::Phishing])).await;

    assert!(report.success);
    assert_eq!(
        report.phishing_result.unwrap().data.unwrap()["isQuishing"],
        json!(true)
    );
}

#[tokio::test]
async fn upload_only_never_calls_the_assign_tool() {
    let fixture = ServiceFixture::tool_first(StubResolver::user("u-1", None));
    let svc = fixture.build();

    let mut request = user_request(vec![ChannelKind::Phishing, ChannelKind::Training]);
    request.upload_only = true;

    let report = svc.run(&request).await;

    assert!(report.success);
    assert!(fixture.assigner.seen.lock().unwrap().is_empty());
    let phishing = report.phishing_result.unwrap();
    assert!(phishing.message.as_ref().unwrap().contains("generated and uploaded"));
    assert_eq!(
        phishing.data.as_ref().unwrap()["assigned"],
        json!(false)
    );
}

#[tokio::test]
async fn duplicate_channels_run_once() {
    let fixture = ServiceFixture::tool_first(StubResolver::user("u-1", None));
    let svc = fixture.build();

    let report = svc
        .run(&user_request(vec![
            ChannelKind::Phishing,
            ChannelKind::Phishing,
        ]))
        .await;

    assert!(report.success);
    assert_eq!(fixture.phishing_generator.calls.load(Ordering::SeqCst), 1);
    assert_eq!(fixture.assigner.seen.lock().unwrap().len(), 1);
    // The summary counts the channel once as well.
    assert_eq!(
        report.message.as_deref(),
        Some("All 1 requested channel(s) completed")
    );
}
