//! Tests for the type registry.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

fn resolve_now(registry: &TypeRegistry, type_name: &str, raw: &str) -> Result<ConfigValue, ResolveError> {
    match registry.lookup(type_name).unwrap().resolve(raw, &ApplicationData::none()) {
        Resolution::Ready(result) => result,
        Resolution::Pending(_) => panic!("{type_name} should resolve immediately"),
    }
}

#[test]
fn builtin_names_and_phases() {
    let registry = TypeRegistry::builtin();
    assert_eq!(
        registry.names(),
        vec!["Base64", "Channel", "Guild", "JSON", "None", "Regex", "int", "str"]
    );
    for name in ["str", "Base64", "int", "JSON", "Regex", "None"] {
        assert!(!registry.lookup(name).unwrap().is_deferred(), "{name}");
    }
    assert!(registry.lookup("Guild").unwrap().is_deferred());
    assert!(registry.lookup("Channel").unwrap().is_deferred());
    assert!(registry.lookup("Upper").is_none());
}

#[test]
fn builtin_immediate_resolvers() {
    let registry = TypeRegistry::builtin();

    assert_eq!(resolve_now(&registry, "str", "Alice").unwrap(), ConfigValue::Str("Alice".into()));
    assert_eq!(resolve_now(&registry, "int", "30").unwrap(), ConfigValue::Int(30));
    assert_eq!(resolve_now(&registry, "int", "-7").unwrap(), ConfigValue::Int(-7));
    assert_eq!(resolve_now(&registry, "Base64", "aGk=").unwrap(), ConfigValue::Str("hi".into()));
    assert_eq!(resolve_now(&registry, "None", "anything").unwrap(), ConfigValue::Null);

    let json = resolve_now(&registry, "JSON", r#"{"a": [1, 2]}"#).unwrap();
    assert_eq!(json.as_json().unwrap()["a"][1], 2);

    let re = resolve_now(&registry, "Regex", r"^ab+c$").unwrap();
    assert!(re.as_regex().unwrap().is_match("abbbc"));
}

#[test]
fn builtin_resolvers_reject_bad_input() {
    let registry = TypeRegistry::builtin();
    assert!(matches!(resolve_now(&registry, "int", "thirty"), Err(ResolveError::InvalidInt(_))));
    assert!(matches!(resolve_now(&registry, "JSON", "{"), Err(ResolveError::InvalidJson(_))));
    assert!(matches!(resolve_now(&registry, "Regex", "(unclosed"), Err(ResolveError::InvalidRegex(_))));
}

#[test]
fn deferred_builtins_return_pending() {
    let registry = TypeRegistry::builtin();
    let resolution = registry.lookup("Guild").unwrap().resolve("123", &ApplicationData::none());
    assert!(resolution.is_pending());
}

#[tokio::test]
async fn deferred_builtin_without_context_fails_on_await() {
    let registry = TypeRegistry::builtin();
    let resolution = registry.lookup("Channel").unwrap().resolve("123", &ApplicationData::none());
    let err = resolution.into_value().await.unwrap_err();
    assert!(matches!(err, ResolveError::MissingContext(_)));
}

#[test]
fn overrides_shadow_builtins() {
    let custom: TypeRegistry = [(
        "str".to_string(),
        TypeEntry::immediate(|v, _| Ok(ConfigValue::Str(format!("<{v}>")))),
    )]
    .into_iter()
    .collect();

    let registry = TypeRegistry::builtin().merge(custom);
    assert_eq!(registry.len(), TypeRegistry::builtin().len());
    assert_eq!(resolve_now(&registry, "str", "x").unwrap(), ConfigValue::Str("<x>".into()));
}

#[test]
fn overrides_add_new_types() {
    let registry = TypeRegistry::builtin().with(
        "Upper",
        TypeEntry::immediate(|v, _| Ok(v.to_uppercase().into())),
    );
    assert!(registry.contains("Upper"));
    assert_eq!(resolve_now(&registry, "Upper", "hi").unwrap(), ConfigValue::Str("HI".into()));
}

#[test]
fn insert_returns_shadowed_entry() {
    let mut registry = TypeRegistry::new();
    assert!(registry.is_empty());
    assert!(registry.insert("flag", TypeEntry::none()).is_none());
    let previous = registry.insert("flag", TypeEntry::new(|_, _| Resolution::Ready(Ok(ConfigValue::Int(1))), true));
    assert!(!previous.unwrap().is_deferred());
    assert!(registry.lookup("flag").unwrap().is_deferred());
}

#[test]
fn constructor_receives_application_data() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let entry = TypeEntry::immediate(move |v, data| {
        seen.fetch_add(1, Ordering::SeqCst);
        let prefix = data
            .downcast_ref::<String>()
            .ok_or_else(|| ResolveError::Custom("missing prefix".into()))?;
        Ok(ConfigValue::Str(format!("{prefix}{v}")))
    });

    let data = ApplicationData::new(String::from("env-"));
    match entry.resolve("prod", &data) {
        Resolution::Ready(result) => assert_eq!(result.unwrap(), ConfigValue::Str("env-prod".into())),
        Resolution::Pending(_) => panic!("immediate entry returned a future"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
