use super::*;
use crate::test_utils::arb_messy_string;
use proptest::prelude::*;

fn arb_log_format() -> impl Strategy<Value = LogFormat> {
    prop_oneof![Just(LogFormat::Pretty), Just(LogFormat::Json)]
}

fn arb_scope() -> impl Strategy<Value = FingerprintScope> {
    prop_oneof![Just(FingerprintScope::Strict), Just(FingerprintScope::Card)]
}

fn arb_log_dir() -> impl Strategy<Value = PathBuf> {
    "[a-z/]{1,20}".prop_map(PathBuf::from)
}

/// Generates an arbitrary Config
fn arb_config() -> impl Strategy<Value = Config> {
    (
        arb_messy_string(),
        arb_messy_string(),
        arb_log_format(),
        prop::option::of(arb_log_dir()),
        arb_scope(),
        prop::option::of(arb_messy_string()),
    )
        .prop_map(
            |(database_url, bind_address, log_format, log_dir, fingerprint_scope, server_url)| Config {
                database_url,
                bind_address,
                log_format,
                log_dir,
                fingerprint_scope,
                server_url,
            },
        )
}

/// Generates an arbitrary ConfigUpdate
fn arb_config_update() -> impl Strategy<Value = ConfigUpdate> {
    (
        prop::option::of(arb_messy_string()),
        prop::option::of(arb_messy_string()),
        prop::option::of(arb_log_format()),
        prop::option::of(arb_log_dir()),
        prop::option::of(arb_scope()),
        prop::option::of(arb_messy_string()),
    )
        .prop_map(
            |(database_url, bind_address, log_format, log_dir, fingerprint_scope, server_url)| ConfigUpdate {
                database_url,
                bind_address,
                log_format,
                log_dir,
                fingerprint_scope,
                server_url,
            },
        )
}

// ============================================================================
// C1: apply_update Algebraic Properties
// ============================================================================

proptest! {
    /// C1.1: Identity: apply_update(default) == original config
    #[test]
    fn prop_c1_1_identity(config in arb_config()) {
        let original = config.clone();
        let updated = config.apply_update(ConfigUpdate::default());

        prop_assert_eq!(updated.database_url, original.database_url);
        prop_assert_eq!(updated.bind_address, original.bind_address);
        prop_assert_eq!(updated.log_format, original.log_format);
        prop_assert_eq!(updated.log_dir, original.log_dir);
        prop_assert_eq!(updated.fingerprint_scope, original.fingerprint_scope);
        prop_assert_eq!(updated.server_url, original.server_url);
    }

    /// C1.2: Last-write-wins: b's Some fields override a's, which override the base
    #[test]
    fn prop_c1_2_last_write_wins(
        config in arb_config(),
        a in arb_config_update(),
        b in arb_config_update(),
    ) {
        let after_ab = config.clone().apply_update(a.clone()).apply_update(b.clone());

        let expected_url = b.database_url.or(a.database_url).unwrap_or(config.database_url);
        let expected_bind = b.bind_address.or(a.bind_address).unwrap_or(config.bind_address);
        let expected_format = b.log_format.or(a.log_format).unwrap_or(config.log_format);
        let expected_dir = b.log_dir.or(a.log_dir).or(config.log_dir);
        let expected_scope = b.fingerprint_scope.or(a.fingerprint_scope).unwrap_or(config.fingerprint_scope);
        let expected_server = b.server_url.or(a.server_url).or(config.server_url);

        prop_assert_eq!(after_ab.database_url, expected_url);
        prop_assert_eq!(after_ab.bind_address, expected_bind);
        prop_assert_eq!(after_ab.log_format, expected_format);
        prop_assert_eq!(after_ab.log_dir, expected_dir);
        prop_assert_eq!(after_ab.fingerprint_scope, expected_scope);
        prop_assert_eq!(after_ab.server_url, expected_server);
    }
}

// ============================================================================
// C2: config_from_args Mapping
// ============================================================================

proptest! {
    /// C2.1: config_from_args preserves every server field and never sets server_url
    #[test]
    fn prop_c2_1_args_mapping(
        database_url in prop::option::of(arb_messy_string()),
        bind_address in prop::option::of(arb_messy_string()),
        log_format in prop::option::of(arb_log_format()),
        fingerprint_scope in prop::option::of(arb_scope()),
    ) {
        let args = CliArgs {
            database_url: database_url.clone(),
            bind_address: bind_address.clone(),
            log_format,
            log_dir: None,
            fingerprint_scope,
        };

        let update = config_from_args(args);

        prop_assert_eq!(update.database_url, database_url);
        prop_assert_eq!(update.bind_address, bind_address);
        prop_assert_eq!(update.log_format, log_format);
        prop_assert_eq!(update.fingerprint_scope, fingerprint_scope);
        prop_assert_eq!(update.server_url, None);
    }
}

// ============================================================================
// C3: FingerprintScope parsing
// ============================================================================

proptest! {
    /// C3.1: Scope names parse regardless of case and padding
    #[test]
    fn prop_c3_1_scope_parse_case_insensitive(scope in arb_scope(), upper in any::<bool>()) {
        let name = match scope {
            FingerprintScope::Strict => "strict",
            FingerprintScope::Card => "card",
        };
        let input = if upper { format!("  {}  ", name.to_uppercase()) } else { name.to_string() };

        prop_assert_eq!(input.parse::<FingerprintScope>().unwrap(), scope);
    }
}
