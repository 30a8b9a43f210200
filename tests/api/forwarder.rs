use std::time::Duration;

use forms_to_mailchimp::domain::MailchimpConfig;
use secrecy::Secret;
use serde_json::json;
use wiremock::matchers::any;
use wiremock::matchers::bearer_token;
use wiremock::matchers::body_json;
use wiremock::matchers::body_partial_json;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::Mock;
use wiremock::ResponseTemplate;

use crate::helpers::config;
use crate::helpers::config_with_mapping;
use crate::helpers::spawn_forwarder;
use crate::helpers::spawn_forwarder_with_truncated_response;
use crate::helpers::spawn_forwarder_with_timeout;
use crate::helpers::submission;
use crate::helpers::Level;
use crate::helpers::TestForwarder;
use crate::helpers::API_KEY;
use crate::helpers::FORM;
use crate::helpers::LIST_ID;
use crate::helpers::MEMBERS_PATH;
use crate::helpers::SUBMISSION_ID;

/// Fail the test if anything at all reaches Mailchimp
async fn expect_no_requests(app: &TestForwarder) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.mailchimp_server)
        .await;
}

#[tokio::test]
async fn missing_credentials() {
    for (api_key, list_id, msg) in [
        (None, None, "empty config"),
        (Some(API_KEY), None, "no list id"),
        (None, Some(LIST_ID), "no api key"),
        (Some(""), Some(LIST_ID), "empty api key"),
        (Some(API_KEY), Some(""), "empty list id"),
    ] {
        let app = spawn_forwarder().await;
        expect_no_requests(&app).await;

        let cfg = MailchimpConfig {
            api_key: api_key.map(|k| Secret::new(k.to_string())),
            list_id: list_id.map(str::to_string),
            ..Default::default()
        };
        app.forwarder
            .process(&submission(json!({ "email": "test@example.com" })), &cfg)
            .await;

        let event = app.log.only();
        assert_eq!(event.level, Level::Warn, "{msg}");
        assert_eq!(
            event.message, "Mailchimp connector: Missing API key or list ID",
            "{msg}"
        );
        assert_eq!(event.context.get("form"), Some(&json!(FORM)));
        assert_eq!(event.context.get("submission_id"), Some(&json!(SUBMISSION_ID)));
    }
}

#[tokio::test]
async fn invalid_email() {
    for (data, msg) in [
        (json!({ "email": "invalid-email" }), "no @"),
        (json!({ "email": "" }), "empty"),
        (json!({ "email": null }), "null"),
        (json!({ "email": 42 }), "not a string"),
        (json!({ "name": "John" }), "absent"),
    ] {
        let app = spawn_forwarder().await;
        expect_no_requests(&app).await;

        app.forwarder.process(&submission(data.clone()), &config()).await;

        let event = app.log.only();
        assert_eq!(event.level, Level::Warn, "{msg}");
        assert_eq!(event.message, "Mailchimp connector: Invalid or missing email");
        assert_eq!(event.context.get("email_field"), Some(&json!("email")));
        // absent fields are reported as null
        let submitted = data.get("email").cloned().unwrap_or(json!(null));
        assert_eq!(event.context.get("email"), Some(&submitted), "{msg}");
    }
}

#[tokio::test]
async fn email_field_is_configurable() {
    let app = spawn_forwarder().await;
    Mock::given(path(MEMBERS_PATH))
        .and(body_partial_json(json!({ "email_address": "test@example.com" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    let cfg = MailchimpConfig {
        email_field: "contact_email".to_string(),
        ..config()
    };
    app.forwarder
        .process(
            &submission(json!({ "email": "wrong@example.com", "contact_email": "test@example.com" })),
            &cfg,
        )
        .await;

    assert_eq!(app.log.only().level, Level::Info);
}

#[tokio::test]
async fn api_key_without_datacenter() {
    let app = spawn_forwarder().await;
    expect_no_requests(&app).await;

    let cfg = MailchimpConfig {
        api_key: Some(Secret::new("testkey".to_string())),
        ..config()
    };
    app.forwarder
        .process(&submission(json!({ "email": "test@example.com" })), &cfg)
        .await;

    let event = app.log.only();
    assert_eq!(event.level, Level::Error);
    assert_eq!(event.message, "Mailchimp connector: Invalid API key format");
    assert_eq!(
        event.context.keys().collect::<Vec<_>>(),
        ["form", "submission_id"]
    );
}

#[tokio::test]
async fn subscribed() {
    let app = spawn_forwarder().await;
    Mock::given(path(MEMBERS_PATH))
        .and(method("POST"))
        .and(bearer_token(API_KEY))
        .and(body_json(json!({
            "email_address": "test@example.com",
            "status": "subscribed",
            "merge_fields": {},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "abc" })))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    app.forwarder
        .process(&submission(json!({ "email": "test@example.com" })), &config())
        .await;

    let event = app.log.only();
    assert_eq!(event.level, Level::Info);
    assert_eq!(event.message, "Mailchimp subscriber added successfully");
    assert_eq!(event.context.get("email"), Some(&json!("test@example.com")));
    assert_eq!(event.context.get("list_id"), Some(&json!(LIST_ID)));
    assert_eq!(event.context.get("status"), Some(&json!("subscribed")));
    assert_eq!(event.context.get("form"), Some(&json!(FORM)));
    assert_eq!(event.context.get("submission_id"), Some(&json!(SUBMISSION_ID)));
}

#[tokio::test]
async fn double_optin_is_pending() {
    let app = spawn_forwarder().await;
    Mock::given(path(MEMBERS_PATH))
        .and(body_partial_json(json!({ "status": "pending" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    let cfg = MailchimpConfig {
        double_optin: true,
        ..config()
    };
    app.forwarder
        .process(&submission(json!({ "email": "test@example.com" })), &cfg)
        .await;

    let event = app.log.only();
    assert_eq!(event.level, Level::Info);
    assert_eq!(event.context.get("status"), Some(&json!("pending")));
}

#[tokio::test]
async fn only_submitted_fields_are_merged() {
    let app = spawn_forwarder().await;
    Mock::given(path(MEMBERS_PATH))
        .and(body_json(json!({
            "email_address": "test@example.com",
            "status": "subscribed",
            "merge_fields": { "PHONE": "555-1234" },
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    let cfg = config_with_mapping(&[
        ("phone", "PHONE"),
        ("first_name", "FNAME"),
        ("", "LNAME"),
        ("email", ""),
    ]);
    app.forwarder
        .process(
            &submission(json!({ "email": "test@example.com", "phone": "555-1234" })),
            &cfg,
        )
        .await;

    assert_eq!(app.log.only().level, Level::Info);
}

#[tokio::test]
async fn rejected_by_mailchimp() {
    let app = spawn_forwarder().await;
    let body = json!({
        "title": "Invalid Resource",
        "status": 400,
        "detail": "Your merge fields were invalid.",
        "errors": [{ "field": "FNAME", "message": "Please enter a value" }],
    });
    Mock::given(path(MEMBERS_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(body.clone()))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    app.forwarder
        .process(&submission(json!({ "email": "test@example.com" })), &config())
        .await;

    let event = app.log.only();
    assert_eq!(event.level, Level::Error);
    assert_eq!(event.message, "Mailchimp API error");
    assert_eq!(event.context.get("status_code"), Some(&json!(400)));
    assert_eq!(
        event.context.get("error_detail"),
        Some(&json!("Your merge fields were invalid."))
    );
    assert_eq!(event.context.get("error_list"), Some(&body["errors"]));
    assert_eq!(event.context.get("full_response_body"), Some(&body));
    assert_eq!(event.context.get("email"), Some(&json!("test@example.com")));
}

#[tokio::test]
async fn rejected_without_json_body() {
    let app = spawn_forwarder().await;
    Mock::given(path(MEMBERS_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    app.forwarder
        .process(&submission(json!({ "email": "test@example.com" })), &config())
        .await;

    let event = app.log.only();
    assert_eq!(event.level, Level::Error);
    assert_eq!(event.context.get("status_code"), Some(&json!(503)));
    assert_eq!(event.context.get("error_detail"), Some(&json!("Unknown error")));
    assert_eq!(event.context.get("error_list"), Some(&json!([])));
    assert_eq!(
        event.context.get("full_response_body"),
        Some(&json!("upstream unavailable"))
    );
}

#[tokio::test]
async fn rejected_with_null_detail() {
    let app = spawn_forwarder().await;
    let body = json!({ "status": 400, "detail": null, "errors": null });
    Mock::given(path(MEMBERS_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(body.clone()))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    app.forwarder
        .process(&submission(json!({ "email": "test@example.com" })), &config())
        .await;

    let event = app.log.only();
    assert_eq!(event.level, Level::Error);
    assert_eq!(event.message, "Mailchimp API error");
    assert_eq!(event.context.get("error_detail"), Some(&json!("Unknown error")));
    assert_eq!(event.context.get("error_list"), Some(&json!([])));
    assert_eq!(event.context.get("full_response_body"), Some(&body));
}

#[tokio::test]
async fn truncated_error_body_is_a_transport_failure() {
    let (forwarder, log) = spawn_forwarder_with_truncated_response();

    forwarder
        .process(&submission(json!({ "email": "test@example.com" })), &config())
        .await;

    let event = log.only();
    assert_eq!(event.level, Level::Error);
    assert_eq!(event.message, "Mailchimp connector exception");
    assert!(event.context.get("error_message").is_some());
    assert!(event.context.get("status_code").is_none());
    assert_eq!(event.context.get("email"), Some(&json!("test@example.com")));
}

#[tokio::test]
async fn transport_failure() {
    let app = spawn_forwarder_with_timeout(200).await;
    Mock::given(path(MEMBERS_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    app.forwarder
        .process(&submission(json!({ "email": "test@example.com" })), &config())
        .await;

    let event = app.log.only();
    assert_eq!(event.level, Level::Error);
    assert_eq!(event.message, "Mailchimp connector exception");
    assert!(event.context.get("error_message").is_some());
    assert_eq!(event.context.get("email"), Some(&json!("test@example.com")));
}

#[tokio::test]
async fn every_call_sends_a_request() {
    let app = spawn_forwarder().await;
    Mock::given(path(MEMBERS_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&app.mailchimp_server)
        .await;

    let sub = submission(json!({ "email": "test@example.com" }));
    app.forwarder.process(&sub, &config()).await;
    app.forwarder.process(&sub, &config()).await;

    let records = app.log.records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.level == Level::Info));
}
