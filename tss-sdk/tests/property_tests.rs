//! Property-based tests for configuration, URL resolution and uploads.
//!
//! Tests validate:
//! - Server identity exclusivity
//! - Slash-normalized URL composition
//! - Upload filename defaults
//! - Secret non-exposure in debug output

use proptest::prelude::*;
use secrecy::ExposeSecret;
use tss_sdk::{
    Client, Configuration, Endpoint, Resource, SecretField, TssError, UserCredential,
};
use tss_test_utils::{
    bare_filename_strategy, filename_with_extension_strategy, secret_value_strategy,
    server_url_strategy, slashy_path_strategy, tenant_strategy, tld_strategy, username_strategy,
};

fn creds() -> UserCredential {
    UserCredential::password("u", "p")
}

fn after_scheme(url: &str) -> &str {
    url.split_once("://").map_or(url, |(_, rest)| rest)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Exactly one of server URL and tenant must be set.
    #[test]
    fn prop_identity_must_be_exclusive(
        server_url in server_url_strategy(),
        tenant in tenant_strategy(),
    ) {
        let mut both = Configuration::for_server(server_url.clone(), creds());
        both.tenant = tenant.clone();
        prop_assert!(matches!(Client::new(both), Err(TssError::InvalidConfig(_))));

        prop_assert!(matches!(
            Client::new(Configuration::new(creds())),
            Err(TssError::InvalidConfig(_))
        ));

        prop_assert!(Client::new(Configuration::for_server(server_url, creds())).is_ok());
        prop_assert!(Client::new(Configuration::for_tenant(tenant, creds())).is_ok());
    }

    /// The token URL is the base joined to the token path, without doubled
    /// slashes, whatever slashes the inputs carry.
    #[test]
    fn prop_token_url_has_single_slashes(
        server_url in server_url_strategy(),
        token_path in slashy_path_strategy(),
    ) {
        let client = Client::new(
            Configuration::for_server(server_url.clone(), creds())
                .with_token_path_uri(token_path.clone()),
        )
        .unwrap();

        let url = client.url_for(Endpoint::Token, "");

        prop_assert!(!after_scheme(&url).contains("//"), "doubled slash in {}", url);
        prop_assert_eq!(
            url,
            format!("{}/{}", server_url.trim_end_matches('/'), token_path.trim_matches('/'))
        );
    }

    /// Resource URLs are `{base}/{api}/{resource}/{path}`.
    #[test]
    fn prop_resource_url_composition(
        tenant in tenant_strategy(),
        tld in tld_strategy(),
        api_path in slashy_path_strategy(),
        path in slashy_path_strategy(),
    ) {
        let client = Client::new(
            Configuration::for_tenant(tenant.clone(), creds())
                .with_tld(tld.clone())
                .with_api_path_uri(api_path.clone()),
        )
        .unwrap();

        let url = client.url_for(Resource::Secrets.into(), &path);

        prop_assert!(!after_scheme(&url).contains("//"), "doubled slash in {}", url);
        prop_assert_eq!(
            url,
            format!(
                "https://{tenant}.secretservercloud.{tld}/{}/secrets/{}",
                api_path.trim_matches('/'),
                path.trim_matches('/')
            )
        );
    }

    /// Names without an extension get `.txt`; names with one are kept.
    #[test]
    fn prop_upload_filename(
        bare in bare_filename_strategy(),
        named in filename_with_extension_strategy(),
    ) {
        let field = SecretField::file("f", bare.clone(), "");
        prop_assert_eq!(field.upload_filename(), format!("{bare}.txt"));

        let field = SecretField::file("f", named.clone(), "");
        prop_assert_eq!(field.upload_filename(), named);
    }

    /// A static token is handed back without any network call.
    #[test]
    fn prop_static_token_needs_no_network(token in secret_value_strategy()) {
        let client = Client::new(Configuration::for_server(
            "https://unreachable.invalid",
            UserCredential::access_token(token.clone()),
        ))
        .unwrap();

        let resolved = tokio_test::block_on(client.access_token()).unwrap();
        prop_assert_eq!(resolved.expose_secret(), token.as_str());
    }

    /// Credentials never show their secrets in debug output.
    #[test]
    fn prop_credentials_redacted_in_debug(
        username in username_strategy(),
        password in secret_value_strategy(),
    ) {
        let config = Configuration::for_server(
            "https://h",
            UserCredential::password(username.clone(), password.clone()),
        );
        let debug = format!("{config:?}");

        prop_assert!(!debug.contains(&password), "Debug output should not contain password");
        prop_assert!(debug.contains(&username), "Debug output should contain username");
    }
}

#[test]
fn test_documented_resource_url() {
    let client = Client::new(Configuration::for_server("https://h/", creds())).unwrap();
    assert_eq!(
        client.url_for(Resource::Secrets.into(), "5/fields/x"),
        "https://h/api/v1/secrets/5/fields/x"
    );
}

#[test]
fn test_documented_filenames() {
    assert_eq!(SecretField::file("f", "foo", "").upload_filename(), "foo.txt");
    assert_eq!(SecretField::file("f", "", "").upload_filename(), "File.txt");
    assert_eq!(SecretField::file("f", "foo.bin", "").upload_filename(), "foo.bin");
}
