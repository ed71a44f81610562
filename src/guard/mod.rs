//! Ownership-scoped authorization.
//!
//! Every tenant-owned resource resolves to its root assistant through a fixed,
//! statically known chain of foreign keys. One generic routine interprets the
//! chain as a single joined lookup that also asserts the assistant's owner.
//! A miss is always "not found": nonexistent ids, resources owned by another
//! principal, and detached intermediate links are indistinguishable to callers.

use uuid::Uuid;

use crate::database::Database;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Assistant,
    Faq,
    Document,
    ContactForm,
    Conversation,
    Website,
    WebsitePage,
}

/// Static ownership chain: the resource's table plus ordered FK hops up to
/// `assistants`. Each hop is (fk column on the current table, parent table).
pub struct OwnershipPath {
    pub table: &'static str,
    pub hops: &'static [(&'static str, &'static str)],
}

impl ResourceKind {
    pub fn ownership_path(self) -> OwnershipPath {
        match self {
            ResourceKind::Assistant => OwnershipPath {
                table: "assistants",
                hops: &[],
            },
            ResourceKind::Faq => OwnershipPath {
                table: "faqs",
                hops: &[("assistant_id", "assistants")],
            },
            ResourceKind::Document => OwnershipPath {
                table: "documents",
                hops: &[("assistant_id", "assistants")],
            },
            ResourceKind::ContactForm => OwnershipPath {
                table: "contact_forms",
                hops: &[("assistant_id", "assistants")],
            },
            ResourceKind::Conversation => OwnershipPath {
                table: "conversations",
                hops: &[("assistant_id", "assistants")],
            },
            ResourceKind::Website => OwnershipPath {
                table: "websites",
                hops: &[("assistant_id", "assistants")],
            },
            ResourceKind::WebsitePage => OwnershipPath {
                table: "website_pages",
                hops: &[("website_id", "websites"), ("assistant_id", "assistants")],
            },
        }
    }
}

/// May `principal_id` act on resource `resource_id` of `kind`?
///
/// Returns the resource id on success so callers can proceed by id. Evaluated
/// fresh on every request; nothing is cached.
pub async fn authorize(
    db: &Database,
    principal_id: Uuid,
    kind: ResourceKind,
    resource_id: Uuid,
) -> Result<Uuid, ApiError> {
    let sql = ownership_sql(&kind.ownership_path());

    let row: Option<(Uuid,)> = sqlx::query_as(&sql)
        .bind(resource_id)
        .bind(principal_id)
        .fetch_optional(db.pool())
        .await?;

    row.map(|(id,)| id).ok_or_else(ApiError::resource_not_found)
}

/// Render the chain as one joined, owner-asserting lookup. All identifiers
/// come from the static path table above, never from request input.
fn ownership_sql(path: &OwnershipPath) -> String {
    let mut sql = format!("SELECT r.id FROM {} r", path.table);
    let mut alias = String::from("r");

    for (i, (fk, parent)) in path.hops.iter().enumerate() {
        let next = format!("t{}", i + 1);
        sql.push_str(&format!(" JOIN {} {} ON {}.id = {}.{}", parent, next, next, alias, fk));
        alias = next;
    }

    sql.push_str(&format!(" WHERE r.id = $1 AND {}.user_id = $2", alias));
    sql
}
