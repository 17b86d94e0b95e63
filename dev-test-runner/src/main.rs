use json_iface::{Codegen, ColorChoice, Inference, RenderOptions, TerminalEnv};
use serde_json::{json, Value};

/// Realistic MongoDB-export-like samples:
/// - `_id` in several encodings (string, Extended JSON `$oid`)
/// - two-valued enum-ish strings, free text, and Extended JSON dates
/// - nested objects whose fields vary between documents
/// - arrays of objects that differ past the first element
fn realistic_samples() -> Vec<Value> {
    vec![
        json!({
            "_id": {"$oid": "65f1a0c2e4b0a1b2c3d4e5f6"},
            "email": "ada@example.com",
            "plan": "pro",
            "verified": true,
            "createdAt": {"$date": "2024-03-01T09:30:00Z"},
            "profile": {"displayName": "Ada", "age": 36, "locale": "en-GB"},
            "devices": [
                {"platform": "ios", "lastSeen": {"$date": "2024-03-02T10:00:00Z"}},
                {"platform": "android", "pushToken": "abc"}
            ],
            "tags": ["beta", "early-adopter"],
            "scores": [0.7, 0.9],
            "flags": [true, false],
            "notes": null
        }),
        json!({
            "_id": "65f1a0c2e4b0a1b2c3d4e5f7",
            "email": "grace@example.com",
            "plan": "free",
            "verified": false,
            "createdAt": {"$date": "2024-03-05T12:00:00Z"},
            "profile": {"displayName": "Grace", "company": {"name": "Navy", "size": 1000}},
            "devices": [],
            "tags": [],
            "billing-address": {"line1": "1 Main St", "zip": "10001"}
        }),
        json!({
            "_id": "65f1a0c2e4b0a1b2c3d4e5f8",
            "email": "linus@example.com",
            "plan": "pro",
            "verified": "yes",
            "profile": {"displayName": "Linus", "locale": "fi-FI"},
            "mixed": [1, "two", {"three": 3}]
        }),
    ]
}

fn main() {
    let samples = realistic_samples();

    // 1) observe every sample
    let mut inf = Inference::new();
    for v in &samples {
        inf.observe_value(v);
    }

    // 2) finalize + sort
    let schema = inf.solve();

    // 3) render
    let color = ColorChoice::Auto.resolve(&TerminalEnv::detect());
    if color {
        // FORCE_COLOR may win over a piped stdout
        colored::control::set_override(true);
    }
    let mut cg = Codegen::new(RenderOptions { indent: 2, color });
    cg.emit(&schema, "account");
    println!("{}", cg.into_string());

    match serde_json::to_string_pretty(&schema) {
        Ok(src) => println!("{src}"),
        Err(error) => eprintln!("failed to serialize schema: {error}"),
    }
}
