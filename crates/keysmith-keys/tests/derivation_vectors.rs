// Copyright (c) Hetu Project
// SPDX-License-Identifier: Apache-2.0

//! Golden derivation fixtures for the full seed-to-identity pipeline.

use keysmith_keys::{
    derive_account_root, derive_grandchild, derive_master, resolve_key_pair, AccountFormat,
    AccountId, DerivationScheme, KeyError, KeySource, MnemonicFile, PrincipalId, Seed,
    SeedSource,
};
use tempfile::tempdir;
use zeroize::Zeroizing;

const TEST_MNEMONIC: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn zero_seed() -> Seed {
    Seed::from_bytes(vec![0u8; 32]).unwrap()
}

#[test]
fn test_zero_seed_pipeline() {
    let scheme = DerivationScheme::default();
    let seed = zero_seed();

    let master = derive_master(seed.as_bytes(), &scheme).unwrap();
    assert_eq!(
        hex::encode(master.secret_key().to_bytes()),
        "82a34e3867ea7ea4e67e27865d500ae84e98d07ab1bab06526f0a5a5fdcc3eba"
    );
    assert_eq!(
        hex::encode(master.chain_code().as_bytes()),
        "73a206dcfea6640cc65575148d8d18744893bf7fe6d1190ad6acf2af193de4e9"
    );

    let root = derive_account_root(seed.as_bytes(), &scheme).unwrap();
    assert_eq!(root.depth(), 3);
    assert_eq!(
        hex::encode(root.secret_key().to_bytes()),
        "224f588bf0f4df25f4143d2db70203ff1f9b93258c76fbb51890f7f4a42d243b"
    );
    assert_eq!(
        hex::encode(root.chain_code().as_bytes()),
        "8148a87ddb5c5f7ec907df527b47ffdb5bfc089833574174208e8da2ce7e5a3f"
    );

    let change = root.derive_child(0).unwrap();
    assert_eq!(
        hex::encode(change.secret_key().to_bytes()),
        "016b830e80c3cc8e37983dc51da84e3ffed01a0cc9c7d881236cc13187297abf"
    );
    assert_eq!(
        hex::encode(change.chain_code().as_bytes()),
        "0bcdcfb0f1c70f480b64b9e4a12a6087e71a2c08f1a2ff877500f726c0e58452"
    );

    let grandchild = derive_grandchild(&root, 0, &scheme).unwrap();
    assert_eq!(grandchild.depth(), 5);
    assert_eq!(
        hex::encode(grandchild.secret_key().to_bytes()),
        "cb79d536a8e592caa7833e06ad67653e02facca5b12a7abe5ba2d559a4fe2ba2"
    );
}

#[test]
fn test_zero_seed_outputs() {
    let source = KeySource::FromSeed {
        seed: zero_seed(),
        index: 0,
    };
    let pair = resolve_key_pair(&source, &DerivationScheme::default()).unwrap();

    assert_eq!(
        pair.principal().to_string(),
        "4ol5w-raaoz-ufszr-rkoac-ur2ii-ebeh5-uhz6p-xwq4a-sy6ck-ugaeb-vae"
    );
    assert_eq!(
        pair.account().render(AccountFormat::Checksummed),
        "1c35b949bc170c96b5f4d97be8a1a5cb7c1b0ab4247fd991f2a11f7e9d6304d1"
    );
    assert_eq!(
        pair.account().render(AccountFormat::BodyOnly),
        "188:nat8; 23:nat8; 12:nat8; 150:nat8; 181:nat8; 244:nat8; 217:nat8; 123:nat8; \
         232:nat8; 161:nat8; 165:nat8; 203:nat8; 124:nat8; 27:nat8; 10:nat8; 180:nat8; \
         36:nat8; 127:nat8; 217:nat8; 145:nat8; 242:nat8; 161:nat8; 31:nat8; 126:nat8; \
         157:nat8; 99:nat8; 4:nat8; 209:nat8; "
    );
    assert_eq!(
        pair.legacy_address().to_hex(),
        "fc58d914fead6bb554f257f941a1fd3cc7c83b5b"
    );
}

#[test]
fn test_zero_seed_extended_keys() {
    let root = derive_account_root(zero_seed().as_bytes(), &DerivationScheme::default()).unwrap();
    assert_eq!(hex::encode(root.parent_fingerprint()), "5759f88d");
    assert_eq!(
        root.to_xprv().as_str(),
        "xprv9yJezfY4dNvdR4KxNjt3ozKP2YEvZmumgi14B9gfwXgDxwXzZrePJepF46JcJb9G4SUFv6ZdW7ekuPmxdtV6dWsofEbMr6LybM3Hbz98nsj"
    );
    assert_eq!(
        root.to_extended_public_key().to_xpub(),
        "xpub6CJ1QB4xTkUvdYQRUmR4B8G7aa5QyEdd3vveyY6HVsDCqjs97PxdrT8iuMyQmP5dCuGFEf4qjY9JF2wrjMXd7riAVBHiQf9Yc34uLUGiZAs"
    );
}

#[test]
fn test_mnemonic_file_pipeline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("seed.txt");
    std::fs::write(&path, format!("{}\n", TEST_MNEMONIC)).unwrap();
    let scheme = DerivationScheme::default();

    let seed = MnemonicFile::new(&path).load().unwrap();
    let pair = resolve_key_pair(&KeySource::FromSeed { seed, index: 0 }, &scheme).unwrap();
    assert_eq!(
        hex::encode(pair.secret_key().unwrap().to_bytes()),
        "f60151c409cb357e00a4267ad2cfa0001ff431ef5911110d651b1e7fc03451ac"
    );
    assert_eq!(
        pair.public_key_hex(),
        "04abdb60eb7c96408414d1e251d41ca0ecf89a4541768cba7eed8174c53246d58c\
         56031b23388bc7d275b4b26bf29137bdc181ae4d6b6f64f30db8d4bfd9222c27"
    );
    assert_eq!(
        pair.principal().to_string(),
        "tgzar-4lpln-fq34h-6hxo4-wlm3x-6g3or-6hxvr-d6jbw-ooh2b-lzsw4-aqe"
    );
    assert_eq!(
        pair.account().to_string(),
        "f24b889e8efba3d8008512e5f928af25be0fea33c9a44e161649f12912907cbd"
    );
    assert_eq!(
        pair.legacy_address().to_hex(),
        "1a8be227ff535bdab48f1e263602a763f9a53d14"
    );
}

#[test]
fn test_protected_mnemonic_file_pipeline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("seed.txt");
    std::fs::write(&path, TEST_MNEMONIC).unwrap();

    let seed = MnemonicFile::new(&path)
        .with_passphrase(Zeroizing::new("TREZOR".to_string()))
        .load()
        .unwrap();
    let pair = resolve_key_pair(
        &KeySource::FromSeed { seed, index: 0 },
        &DerivationScheme::default(),
    )
    .unwrap();
    assert_eq!(
        pair.principal().to_string(),
        "wio4l-ekrh7-y3l5y-cbdqi-zpvfj-gbygk-66zbg-elxe2-ux5fd-a4shq-aae"
    );
    assert_eq!(
        pair.account().to_string(),
        "b9fd89246cd1f15a0d452ccca720e3389bece4701dfeff126038bff22e37f0f6"
    );
    assert_eq!(
        pair.legacy_address().to_hex(),
        "60e3f376f32c734ea97ae005677adf3995a375f3"
    );
}

#[test]
fn test_raw_scalar_bypass_matches_seed() {
    let scheme = DerivationScheme::default();
    let from_seed = resolve_key_pair(
        &KeySource::FromSeed {
            seed: zero_seed(),
            index: 1,
        },
        &scheme,
    )
    .unwrap();
    let captured = hex::encode(from_seed.secret_key().unwrap().to_bytes());

    let bypass = resolve_key_pair(&KeySource::FromRawScalar(Zeroizing::new(captured)), &scheme)
        .unwrap();
    assert_eq!(bypass.public_key_hex(), from_seed.public_key_hex());
    assert_eq!(
        bypass.principal().to_string(),
        "jj6ur-bhhpx-egqht-7onsc-7ypns-536c4-levf7-uzhpm-hv4pq-oenu7-wqe"
    );
    assert_eq!(bypass.account(), from_seed.account());
    assert_eq!(
        bypass.legacy_address().to_hex(),
        "77ac8a9733800da2ed934c600c5da4db079d7ad3"
    );
    assert_eq!(*bypass.to_pem().unwrap(), *from_seed.to_pem().unwrap());
}

#[test]
fn test_principal_and_account_parse_back() {
    let pair = resolve_key_pair(
        &KeySource::FromSeed {
            seed: zero_seed(),
            index: 0,
        },
        &DerivationScheme::default(),
    )
    .unwrap();

    let principal: PrincipalId = pair.principal().to_string().parse().unwrap();
    assert_eq!(principal, pair.principal());
    assert_eq!(principal.as_slice().len(), 29);

    let account: AccountId = pair.account().to_string().parse().unwrap();
    assert_eq!(account, pair.account());
}

#[test]
fn test_invalid_inputs() {
    let scheme = DerivationScheme::default();
    let result = resolve_key_pair(&KeySource::FromRawScalar(Zeroizing::new("abc".into())), &scheme);
    assert!(matches!(result, Err(KeyError::InvalidHexEncoding(_))));

    let dir = tempdir().unwrap();
    let path = dir.path().join("seed.txt");
    std::fs::write(&path, "").unwrap();
    assert!(matches!(
        MnemonicFile::new(&path).load(),
        Err(KeyError::InvalidSeed(_))
    ));
    assert!(matches!(Seed::from_bytes(Vec::new()), Err(KeyError::InvalidSeed(_))));
}
