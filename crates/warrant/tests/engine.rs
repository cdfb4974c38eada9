//! End-to-end tests: configuration → engine → decisions and filters.

use std::io::Write;
use std::sync::Arc;

use warrant::{ActorContext, Engine, EngineConfig, Predicate, RuleRegistry, WarrantError};
use warrant_testkit::fixtures::{ip, ALLOWED_IP, OTHER_IP};
use warrant_testkit::TestFixture;

const CONFIG: &str = r#"{
    "include_defaults": true,
    "network": {
        "single_ips": ["10.0.0.5"],
        "ip_ranges": [["10.1.0.0", "10.1.0.255"]]
    },
    "policies": {
        "files": {
            "list": [{"type": "owner_only"}, {"type": "group_restricted"}],
            "read": [{"type": "owner_only"}],
            "read_grouped": [{"type": "group_restricted"}],
            "read_ip": [{"type": "ip_single"}],
            "read_range": [{"type": "ip_range"}],
            "read_public": [{"type": "public_if_unrestricted"}],
            "read_any": [{"type": "any_actor"}],
            "curate": [{"type": "access_level", "action": "update"}],
            "admin": [{"type": "admin"}],
            "locked": [{"type": "any_actor"}, {"type": "disable"}],
            "update": []
        }
    }
}"#;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn engine() -> Engine {
    init_tracing();
    let config = EngineConfig::from_json_str(CONFIG).unwrap();
    Engine::from_config(&config).unwrap()
}

#[test]
fn test_resource_types() {
    let engine = engine();
    assert_eq!(
        engine.policies().resource_types().collect::<Vec<_>>(),
        vec!["deposits", "files", "records"]
    );
    engine.require(["files", "records", "deposits"]).unwrap();
}

#[test]
fn test_configured_empty_action() {
    let engine = engine();
    let f = TestFixture::new();

    for actor in f.ordinary_actors() {
        assert!(!engine.evaluate("files", "update", Some(&f.open()), actor).unwrap());
        assert_eq!(
            engine.search_filter("files", "update", actor).unwrap(),
            Predicate::MatchAll
        );
    }
    assert!(engine.evaluate("files", "update", Some(&f.open()), &f.root).unwrap());
}

#[test]
fn test_unconfigured_action() {
    let engine = engine();
    let f = TestFixture::new();

    for actor in f.actors() {
        assert!(!engine.evaluate("files", "delete", Some(&f.open()), actor).unwrap());
        assert_eq!(
            engine.search_filter("files", "delete", actor).unwrap(),
            Predicate::MatchNone
        );
    }
}

#[test]
fn test_unrestricted_resource_open_to_all() {
    let engine = engine();
    let f = TestFixture::new();

    for actor in f.actors() {
        assert!(engine.evaluate("files", "read_any", Some(&f.open()), actor).unwrap());
        assert!(engine.evaluate("files", "read_public", Some(&f.open()), actor).unwrap());
    }
}

#[test]
fn test_owner_only() {
    let engine = engine();
    let f = TestFixture::new();
    let owned = f.owned();

    assert!(engine.evaluate("files", "read", Some(&owned), &f.owner).unwrap());
    assert!(engine.evaluate("files", "read", Some(&owned), &f.co_owner).unwrap());
    assert!(!engine.evaluate("files", "read", Some(&owned), &f.stranger).unwrap());
    assert!(!engine.evaluate("files", "read", Some(&owned), &f.anonymous).unwrap());
}

#[test]
fn test_group_restricted() {
    let engine = engine();
    let f = TestFixture::new();
    let grouped = f.grouped();

    // stranger holds {A}; member holds {A, C}
    assert!(!engine.evaluate("files", "read_grouped", Some(&grouped), &f.stranger).unwrap());
    assert!(engine.evaluate("files", "read_grouped", Some(&grouped), &f.member).unwrap());
}

#[test]
fn test_ip_allow_list() {
    let engine = engine();
    let f = TestFixture::new();
    let marked = f.ip_single();

    let near = ActorContext::user("U1").with_address(ip(ALLOWED_IP));
    let far = ActorContext::user("U1").with_address(ip(OTHER_IP));

    assert!(engine.evaluate("files", "read_ip", Some(&marked), &near).unwrap());
    assert!(!engine.evaluate("files", "read_ip", Some(&marked), &far).unwrap());
    assert!(!engine.evaluate("files", "read_ip", Some(&marked), &f.owner).unwrap());
    assert!(engine.evaluate("files", "read_ip", Some(&f.open()), &far).unwrap());
}

#[test]
fn test_ip_range() {
    let engine = engine();
    let f = TestFixture::new();
    let marked = f.ip_range();

    for (address, expected) in [
        ("10.1.0.0", true),
        ("10.1.0.128", true),
        ("10.1.0.255", true),
        ("10.0.255.255", false),
        ("10.1.1.0", false),
        ("10.1.0.30", true),
    ] {
        let actor = ActorContext::user("U1").with_address(ip(address));
        assert_eq!(
            engine.evaluate("files", "read_range", Some(&marked), &actor).unwrap(),
            expected,
            "{address}"
        );
    }
}

#[test]
fn test_access_level() {
    let engine = engine();
    let f = TestFixture::new();

    assert!(engine.evaluate("files", "curate", Some(&f.curated()), &f.member).unwrap());
    assert!(!engine.evaluate("files", "curate", Some(&f.curated()), &f.owner).unwrap());
    assert!(!engine.evaluate("files", "curate", None, &f.member).unwrap());
}

#[test]
fn test_admin() {
    let engine = engine();
    let f = TestFixture::new();

    assert!(engine.evaluate("files", "admin", None, &f.admin).unwrap());
    assert!(!engine.evaluate("files", "admin", None, &f.owner).unwrap());
}

#[test]
fn test_deny_precedence() {
    let engine = engine();
    let f = TestFixture::new();

    for actor in f.actors() {
        let decision = engine.decide("files", "locked", None, actor).unwrap();
        assert!(!decision.allowed);
        assert!(decision.granting.intersection(&decision.denying).next().is_some());
    }
}

#[test]
fn test_list_filter_is_or_of_units() {
    let engine = engine();
    let f = TestFixture::new();

    let filter = engine.search_filter("files", "list", &f.member).unwrap();
    assert_eq!(
        filter,
        (Predicate::field("applied_restrictions", "owners") & Predicate::field("owners", "U4"))
            | (Predicate::field("applied_restrictions", "groups")
                & (Predicate::field("group_restrictions", "A")
                    | Predicate::field("group_restrictions", "C")))
    );
    assert!(filter.matches(&f.grouped()));
    assert!(!filter.matches(&f.owned()));

    let owner_filter = engine.search_filter("files", "list", &f.owner).unwrap();
    assert!(owner_filter.matches(&f.owned()));
    assert!(!owner_filter.matches(&f.grouped()));
}

#[test]
fn test_search_filter_idempotent() {
    let engine = engine();
    let f = TestFixture::new();

    for actor in f.actors() {
        let first = engine.search_filter("files", "list", actor).unwrap();
        let second = engine.search_filter("files", "list", actor).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.canonical_bytes(), second.canonical_bytes());
    }
}

#[test]
fn test_default_records_policy() {
    let engine = engine();
    let f = TestFixture::new();

    let open_set = f.open();
    let restricted_set = f.restricted();
    let read_open = engine.read("records", &open_set).unwrap();
    let read_restricted = engine.read("records", &restricted_set).unwrap();

    assert!(read_open.allows(&f.anonymous));
    assert!(read_restricted.allows(&f.owner));
    assert!(!read_restricted.allows(&f.stranger));
    assert!(engine.list("records").unwrap().allows(&f.anonymous));
    assert!(!engine.create("records").unwrap().allows(&f.owner));
    assert!(engine.create("records").unwrap().allows(&f.root));
    assert_eq!(
        engine.list("records").unwrap().query_filter(&f.anonymous),
        Predicate::MatchAll
    );
}

#[test]
fn test_unknown_rule_unit_fails_setup() {
    let config = EngineConfig::from_json_str(
        r#"{"policies": {"files": {"read": [{"type": "friends_of_owner"}]}}}"#,
    )
    .unwrap();
    let err = Engine::from_config(&config).unwrap_err();
    assert!(matches!(err, WarrantError::Policy(_)));
    assert!(err.to_string().contains("friends_of_owner"));
}

#[test]
fn test_unknown_resource_type_fails() {
    let engine = engine();
    let f = TestFixture::new();

    assert!(engine.permission("communities", "read", None).is_err());
    assert!(engine.search_filter("communities", "list", &f.owner).is_err());
    assert!(matches!(
        engine.require(["communities"]),
        Err(WarrantError::MissingPolicy(_))
    ));
}

#[test]
fn test_custom_rule_registry() {
    use warrant::core::{Claim, ClaimSet, Resource};
    use warrant::RuleUnit;

    #[derive(Debug)]
    struct Curators;

    impl RuleUnit for Curators {
        fn kind(&self) -> &str {
            "curators"
        }

        fn granting_claims(&self, _: Option<&Resource>, _: &ActorContext) -> ClaimSet {
            ClaimSet::from([Claim::role("curators")])
        }

        fn filter_predicate(&self, actor: &ActorContext) -> Option<Predicate> {
            actor
                .holds(&Claim::role("curators"))
                .then_some(Predicate::MatchAll)
        }
    }

    let mut rules = RuleRegistry::builtin();
    rules.register_unit("curators", || Curators);

    let config = EngineConfig::from_json_str(
        r#"{"policies": {"files": {"list": [{"type": "curators"}]}}}"#,
    )
    .unwrap();
    let engine = Engine::from_config_with_rules(&config, &rules).unwrap();

    let curator = ActorContext::user("U1").with_role("curators");
    assert!(engine.list("files").unwrap().allows(&curator));
    assert!(!engine.list("files").unwrap().allows(&ActorContext::user("U2")));
    assert_eq!(
        engine.search_filter("files", "list", &curator).unwrap(),
        Predicate::MatchAll
    );
}

#[test]
fn test_load_from_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();

    let config = EngineConfig::from_path(file.path()).unwrap();
    let engine = Engine::from_config(&config).unwrap();
    assert!(engine.policies().contains("files"));
}

#[test]
fn test_load_from_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let err = EngineConfig::from_path(&path).unwrap_err();
    assert!(err.to_string().contains("failed to read configuration"));
}

#[test]
fn test_load_invalid_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"policies": {"files": {"read": "owner_only"}}}"#)
        .unwrap();

    let err = EngineConfig::from_path(file.path()).unwrap_err();
    assert!(err.to_string().contains("failed to load configuration"));
}

#[test]
fn test_concurrent_evaluation() {
    let engine = Arc::new(engine());
    let f = TestFixture::new();
    let owned = f.owned();

    std::thread::scope(|scope| {
        for _ in 0..8 {
            let engine = Arc::clone(&engine);
            let f = &f;
            let owned = &owned;
            scope.spawn(move || {
                for _ in 0..100 {
                    assert!(engine.evaluate("files", "read", Some(owned), &f.owner).unwrap());
                    assert!(!engine.evaluate("files", "read", Some(owned), &f.stranger).unwrap());
                    let filter = engine.search_filter("files", "list", &f.owner).unwrap();
                    assert!(filter.matches(owned));
                }
            });
        }
    });
}
