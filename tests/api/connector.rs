use serde_json::Value;

use crate::helpers::spawn_app;

#[tokio::test]
async fn describes_connector() {
    let app = spawn_app().await;
    let resp = app.get("/connector").await;
    assert_eq!(resp.status().as_u16(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["handle"], "mailchimp");
    assert_eq!(body["name"], "Mailchimp");

    let handles: Vec<_> = body["fieldset"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["handle"].as_str().unwrap())
        .collect();
    for handle in ["api_key", "list_id", "email_field"] {
        assert!(handles.contains(&handle), "{handle}");
    }
}
