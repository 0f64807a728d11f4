use super::*;

#[test]
fn token_bundle_uses_camel_case_user_id() {
    let bundle: TokenBundle = serde_json::from_str(r#"{"token":"t1","userId":"u2"}"#).unwrap();
    assert_eq!(bundle, TokenBundle { token: "t1".to_owned(), user_id: "u2".to_owned() });
}

#[test]
fn user_accepts_mongo_style_id() {
    let user: User = serde_json::from_str(r#"{"_id":"u1","username":"ada"}"#).unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.email, None);
}

#[test]
fn project_description_defaults_to_empty() {
    let project: Project = serde_json::from_str(r#"{"id":"p1","name":"Hive"}"#).unwrap();
    assert_eq!(project.description, "");
    assert_eq!(project.owner_id, None);
}

#[test]
fn chat_message_parses_backend_shape() {
    let raw = r#"{"_id":"m1","projectId":"p1","senderId":"u1","senderName":"ada","content":"hi","timestamp":1700000000000}"#;
    let msg: ChatMessage = serde_json::from_str(raw).unwrap();
    assert_eq!(msg.id, "m1");
    assert_eq!(msg.project_id, "p1");
    assert_eq!(msg.sender_name.as_deref(), Some("ada"));
    assert!((msg.timestamp - 1_700_000_000_000.0).abs() < f64::EPSILON);
}

#[test]
fn error_body_tolerates_missing_message() {
    let body: ErrorBody = serde_json::from_str("{}").unwrap();
    assert_eq!(body.message, None);
}

#[test]
fn login_request_serializes_fields() {
    let value = serde_json::to_value(LoginRequest { email: "a@b.c", password: "pw" }).unwrap();
    assert_eq!(value, serde_json::json!({ "email": "a@b.c", "password": "pw" }));
}
