/// Writer schema for audit events. Field order is the wire order.
pub const AUDIT_EVENT_SCHEMA: &str = r#"
{
  "type": "record",
  "name": "AuditEvent",
  "fields": [
    { "name": "created", "type": "string" },
    { "name": "service", "type": "string" },
    { "name": "request_id", "type": "string", "default": "" },
    { "name": "user", "type": "string", "default": "" },
    { "name": "attempted_action", "type": "string" },
    { "name": "action_result", "type": "string" },
    { "name": "params", "type": { "type": "map", "values": "string" }, "default": {} }
  ]
}
"#;
