//! Canonical context digests.
//!
//! The digest partitions the cache: two requests can only ever match
//! when their contexts hash identically. Keys are sorted before
//! hashing so field order never changes the digest, and free-form
//! extras are namespaced so they cannot collide with the fixed fields.

use std::collections::BTreeMap;

use thalamus_core::models::RequestContext;

const KV_SEPARATOR: u8 = 0x1f;
const PAIR_SEPARATOR: u8 = 0x1e;

/// Digest a request context into a stable hex key. Absent fields are
/// omitted entirely, so `None` and a missing extra hash the same.
pub fn context_digest(context: &RequestContext) -> String {
    let mut fields: BTreeMap<String, &str> = BTreeMap::new();
    if let Some(value) = &context.task_type {
        fields.insert("task_type".to_string(), value);
    }
    if let Some(value) = &context.language {
        fields.insert("language".to_string(), value);
    }
    if let Some(value) = &context.user_tier {
        fields.insert("user_tier".to_string(), value);
    }
    for (key, value) in &context.extra {
        fields.insert(format!("extra.{key}"), value);
    }

    let mut hasher = blake3::Hasher::new();
    for (key, value) in &fields {
        hasher.update(key.as_bytes());
        hasher.update(&[KV_SEPARATOR]);
        hasher.update(value.as_bytes());
        hasher.update(&[PAIR_SEPARATOR]);
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_across_insertion_order() {
        let a = RequestContext::default()
            .with_extra("region", "eu")
            .with_extra("beta", "on");
        let b = RequestContext::default()
            .with_extra("beta", "on")
            .with_extra("region", "eu");
        assert_eq!(context_digest(&a), context_digest(&b));
    }

    #[test]
    fn different_values_produce_different_digests() {
        let a = RequestContext::default().with_task_type("code");
        let b = RequestContext::default().with_task_type("chat");
        assert_ne!(context_digest(&a), context_digest(&b));
    }

    #[test]
    fn extras_cannot_impersonate_fixed_fields() {
        let fixed = RequestContext::default().with_task_type("code");
        let spoofed = RequestContext::default().with_extra("task_type", "code");
        assert_ne!(context_digest(&fixed), context_digest(&spoofed));
    }

    #[test]
    fn empty_value_differs_from_absent_field() {
        let absent = RequestContext::default();
        let empty = RequestContext::default().with_task_type("");
        assert_ne!(context_digest(&absent), context_digest(&empty));
    }

    #[test]
    fn key_value_boundaries_do_not_bleed() {
        let a = RequestContext::default().with_extra("ab", "c");
        let b = RequestContext::default().with_extra("a", "bc");
        assert_ne!(context_digest(&a), context_digest(&b));
    }
}
