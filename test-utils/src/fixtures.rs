//! JSON fixtures shaped like Secret Server responses.

use serde_json::{Value, json};

/// Template id used by the password fixtures.
pub const PASSWORD_TEMPLATE_ID: i64 = 6003;
/// Template id used by the file fixtures.
pub const KEY_TEMPLATE_ID: i64 = 6025;

/// A token endpoint grant.
#[must_use]
pub fn access_grant(token: &str) -> Value {
    json!({
        "access_token": token,
        "refresh_token": "refresh-token",
        "token_type": "bearer",
        "expires_in": 1199
    })
}

/// A username/password secret.
#[must_use]
pub fn password_secret(id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("db-{id}"),
        "folderId": 12,
        "siteId": 1,
        "secretTemplateId": PASSWORD_TEMPLATE_ID,
        "secretPolicyId": null,
        "active": true,
        "checkedOut": false,
        "items": [
            {
                "itemId": 101, "fieldId": 108, "fileAttachmentId": null,
                "fieldName": "Username", "slug": "username", "fieldDescription": "The account name",
                "filename": null, "itemValue": "admin",
                "isFile": false, "isNotes": false, "isPassword": false
            },
            {
                "itemId": 102, "fieldId": 110, "fileAttachmentId": null,
                "fieldName": "Password", "slug": "password", "fieldDescription": "The password",
                "filename": null, "itemValue": "s3cr3t!",
                "isFile": false, "isNotes": false, "isPassword": true
            }
        ]
    })
}

/// A secret holding one file attachment under the `private-key` slug.
///
/// `itemValue` carries the server's placeholder, not the file content.
#[must_use]
pub fn key_secret(id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("ssh-{id}"),
        "folderId": 12,
        "secretTemplateId": KEY_TEMPLATE_ID,
        "active": true,
        "items": [
            {
                "itemId": 201, "fieldId": 280, "fileAttachmentId": null,
                "fieldName": "Machine", "slug": "machine",
                "itemValue": "bastion.internal",
                "isFile": false
            },
            {
                "itemId": 202, "fieldId": 284, "fileAttachmentId": 77,
                "fieldName": "Private Key", "slug": "private-key",
                "filename": "id_ed25519", "itemValue": "*** Not Valid For Display ***",
                "isFile": true
            }
        ]
    })
}

/// The password template.
#[must_use]
pub fn password_template() -> Value {
    json!({
        "id": PASSWORD_TEMPLATE_ID,
        "name": "Password",
        "fields": [
            {
                "secretTemplateFieldId": 108, "fieldSlugName": "username",
                "displayName": "Username", "name": "Username", "description": "The account name",
                "isFile": false, "isPassword": false, "isRequired": true
            },
            {
                "secretTemplateFieldId": 110, "fieldSlugName": "password",
                "displayName": "Password", "name": "Password", "description": "The password",
                "isFile": false, "isPassword": true, "isRequired": true
            }
        ]
    })
}

/// The SSH key template.
#[must_use]
pub fn key_template() -> Value {
    json!({
        "id": KEY_TEMPLATE_ID,
        "name": "SSH Key",
        "fields": [
            {
                "secretTemplateFieldId": 280, "fieldSlugName": "machine",
                "name": "Machine", "description": "Host name", "isFile": false
            },
            {
                "secretTemplateFieldId": 284, "fieldSlugName": "private-key",
                "name": "Private Key", "description": "Key file", "isFile": true
            }
        ]
    })
}

/// One page of search hits for the given secret ids.
#[must_use]
pub fn search_page(ids: &[i64]) -> Value {
    let records: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "id": id,
                "name": format!("db-{id}"),
                "folderId": 12,
                "folderPath": "\\Databases",
                "secretTemplateId": PASSWORD_TEMPLATE_ID,
                "secretTemplateName": "Password",
                "active": true,
                "checkedOut": false
            })
        })
        .collect();

    json!({
        "skip": 0,
        "take": 100,
        "total": ids.len(),
        "hasNext": false,
        "records": records
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_consistent() {
        assert_eq!(password_secret(5)["secretTemplateId"], PASSWORD_TEMPLATE_ID);
        assert_eq!(key_secret(9)["items"][1]["fileAttachmentId"], 77);
        assert_eq!(search_page(&[1, 2])["records"].as_array().map(Vec::len), Some(2));
        assert_eq!(access_grant("tok")["access_token"], "tok");
    }
}
