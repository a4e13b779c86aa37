//! Identity commands: principal, account and legacy address

use super::KeySourceArgs;
use crate::config::Config;
use anyhow::Result;
use keysmith_keys::AccountFormat;

/// Textual principal of the derived key.
pub fn principal(args: &KeySourceArgs, config: &Config) -> Result<String> {
    Ok(args.resolve(config)?.principal().to_string())
}

/// Account identifier under the default subaccount. `body_only` drops the
/// checksum and prints the hash bytes as `nat8` elements.
pub fn account(args: &KeySourceArgs, body_only: bool, config: &Config) -> Result<String> {
    let format = if body_only {
        AccountFormat::BodyOnly
    } else {
        AccountFormat::Checksummed
    };
    Ok(args.resolve(config)?.account().render(format))
}

/// Legacy address: 40 lowercase hex characters, no prefix.
pub fn legacy_address(args: &KeySourceArgs, config: &Config) -> Result<String> {
    Ok(args.resolve(config)?.legacy_address().to_hex())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::seeded_config;
    use super::*;

    #[test]
    fn test_principal_from_seed_file() {
        let (_dir, config) = seeded_config();
        assert_eq!(
            principal(&KeySourceArgs::default(), &config).unwrap(),
            "tgzar-4lpln-fq34h-6hxo4-wlm3x-6g3or-6hxvr-d6jbw-ooh2b-lzsw4-aqe"
        );
    }

    #[test]
    fn test_account_formats() {
        let (_dir, config) = seeded_config();
        let args = KeySourceArgs::default();
        assert_eq!(
            account(&args, false, &config).unwrap(),
            "f24b889e8efba3d8008512e5f928af25be0fea33c9a44e161649f12912907cbd"
        );

        let body = account(&args, true, &config).unwrap();
        assert_eq!(body.matches(":nat8; ").count(), 28);
        assert!(body.ends_with("; "));
    }

    #[test]
    fn test_legacy_address_from_seed_file() {
        let (_dir, config) = seeded_config();
        assert_eq!(
            legacy_address(&KeySourceArgs::default(), &config).unwrap(),
            "1a8be227ff535bdab48f1e263602a763f9a53d14"
        );
    }

    #[test]
    fn test_invalid_hex_is_reported() {
        let args = KeySourceArgs {
            private_key_hex: Some("abc".into()),
            ..Default::default()
        };
        let err = principal(&args, &Config::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid private key hex"));
    }
}
