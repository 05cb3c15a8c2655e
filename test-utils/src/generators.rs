//! Shared proptest generators.

use proptest::prelude::*;

/// Generate cloud tenant names.
pub fn tenant_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{1,20}[a-z0-9]"
}

/// Generate cloud top-level domains.
pub fn tld_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("com".to_string()),
        Just("eu".to_string()),
        Just("com.au".to_string()),
        Just("ca".to_string()),
        Just("com.sg".to_string()),
    ]
}

/// Wrap `value` in zero to three slashes on either side.
pub fn with_stray_slashes(value: String) -> impl Strategy<Value = String> {
    (0usize..4, 0usize..4)
        .prop_map(move |(lead, trail)| format!("{}{value}{}", "/".repeat(lead), "/".repeat(trail)))
}

/// Generate slash-separated paths such as `api/v1`, possibly wrapped in
/// stray slashes.
pub fn slashy_path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z0-9_-]{1,12}", 1..4)
        .prop_map(|segments| segments.join("/"))
        .prop_flat_map(with_stray_slashes)
}

/// Generate self-hosted server URLs, with or without a trailing slash and an
/// application path.
pub fn server_url_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("https"), Just("http")],
        "[a-z][a-z0-9-]{0,15}(\\.[a-z]{2,6}){0,2}",
        prop::option::of("[A-Za-z]{3,12}"),
        0usize..3,
    )
        .prop_map(|(scheme, host, app, trail)| {
            let app = app.map(|a| format!("/{a}")).unwrap_or_default();
            format!("{scheme}://{host}{app}{}", "/".repeat(trail))
        })
}

/// Generate filenames that have no extension.
pub fn bare_filename_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_-]{1,20}"
}

/// Generate filenames that end in an extension.
pub fn filename_with_extension_strategy() -> impl Strategy<Value = String> {
    ("[A-Za-z0-9_-]{1,20}", "[a-z0-9]{1,5}").prop_map(|(stem, ext)| format!("{stem}.{ext}"))
}

/// Generate secret values.
pub fn secret_value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9!@#$%^&*]{8,64}"
}

/// Generate usernames.
pub fn username_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{3,15}"
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn slashy_paths_keep_their_core(path in slashy_path_strategy()) {
            prop_assert!(!path.trim_matches('/').is_empty());
            prop_assert!(!path.trim_matches('/').contains("//"));
        }

        #[test]
        fn server_urls_have_a_scheme(url in server_url_strategy()) {
            prop_assert!(url.starts_with("http://") || url.starts_with("https://"));
        }

        #[test]
        fn bare_filenames_have_no_dot(name in bare_filename_strategy()) {
            prop_assert!(!name.contains('.'));
        }
    }
}
