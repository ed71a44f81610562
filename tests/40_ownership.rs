// Ownership guard scenarios: cross-tenant access resolves to not-found, and
// partial updates only touch the fields they name. These need the database
// the server is pointed at; they return early when DATABASE_URL is not set.

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn cross_tenant_resource_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    if common::db_pool().await?.is_none() {
        return Ok(());
    }
    let client = reqwest::Client::new();

    let alice = common::register_account(&server.base_url).await?;
    let bob = common::register_account(&server.base_url).await?;
    let assistant_id = common::create_assistant(&server.base_url, &alice.token, "Support").await?;

    let res = client
        .post(format!("{}/api/assistants/{}/faqs", server.base_url, assistant_id))
        .bearer_auth(&alice.token)
        .json(&json!({ "question": "What are your hours?", "answer": "Always open" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let faq_id = res.json::<serde_json::Value>().await?["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Read, update, and delete by the other tenant all miss identically
    let res = client
        .get(format!("{}/api/faqs/{}", server.base_url, faq_id))
        .bearer_auth(&bob.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .put(format!("{}/api/faqs/{}", server.base_url, faq_id))
        .bearer_auth(&bob.token)
        .json(&json!({ "answer": "hijacked" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/api/faqs/{}", server.base_url, faq_id))
        .bearer_auth(&bob.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // The owner still sees the untouched record
    let res = client
        .get(format!("{}/api/faqs/{}", server.base_url, faq_id))
        .bearer_auth(&alice.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["answer"], "Always open");
    Ok(())
}

#[tokio::test]
async fn nonexistent_resource_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    if common::db_pool().await?.is_none() {
        return Ok(());
    }
    let client = reqwest::Client::new();

    let alice = common::register_account(&server.base_url).await?;
    let bogus = uuid::Uuid::new_v4();

    for path in [
        format!("/api/assistants/{}", bogus),
        format!("/api/faqs/{}", bogus),
        format!("/api/documents/{}", bogus),
        format!("/api/conversations/{}", bogus),
        format!("/api/pages/{}", bogus),
    ] {
        let res = client
            .get(format!("{}{}", server.base_url, path))
            .bearer_auth(&alice.token)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "expected 404 for {}", path);
    }
    Ok(())
}

#[tokio::test]
async fn listings_are_scoped_to_the_owner() -> Result<()> {
    let server = common::ensure_server().await?;
    let Some(pool) = common::db_pool().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let alice = common::register_account(&server.base_url).await?;
    let bob = common::register_account(&server.base_url).await?;
    let assistant_id = common::create_assistant(&server.base_url, &alice.token, "Scoped").await?;

    // Seed a conversation the way the chat widget would
    sqlx::query(
        "INSERT INTO conversations (assistant_id, visitor_label) VALUES ($1::uuid, 'visitor-1')",
    )
    .bind(&assistant_id)
    .execute(&pool)
    .await?;

    let res = client
        .get(format!("{}/api/assistants/{}/conversations", server.base_url, assistant_id))
        .bearer_auth(&alice.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // The same listing under another principal resolves as not-found
    let res = client
        .get(format!("{}/api/assistants/{}/conversations", server.base_url, assistant_id))
        .bearer_auth(&bob.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn partial_update_leaves_unnamed_fields_untouched() -> Result<()> {
    let server = common::ensure_server().await?;
    if common::db_pool().await?.is_none() {
        return Ok(());
    }
    let client = reqwest::Client::new();

    let alice = common::register_account(&server.base_url).await?;
    let bob = common::register_account(&server.base_url).await?;
    let assistant_id = common::create_assistant(&server.base_url, &alice.token, "Masked").await?;
    let bob_assistant_id = common::create_assistant(&server.base_url, &bob.token, "Elsewhere").await?;

    let res = client
        .post(format!("{}/api/assistants/{}/faqs", server.base_url, assistant_id))
        .bearer_auth(&alice.token)
        .json(&json!({
            "question": "Do you ship?",
            "answer": "Worldwide",
            "position": 3
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let faq_id = res.json::<serde_json::Value>().await?["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Only `enabled` is named; everything else must survive
    let res = client
        .put(format!("{}/api/faqs/{}", server.base_url, faq_id))
        .bearer_auth(&alice.token)
        .json(&json!({ "enabled": false }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["enabled"], false);
    assert_eq!(body["data"]["question"], "Do you ship?");
    assert_eq!(body["data"]["answer"], "Worldwide");
    assert_eq!(body["data"]["position"], 3);

    // A caller-supplied ownership key is ignored outright
    let res = client
        .put(format!("{}/api/faqs/{}", server.base_url, faq_id))
        .bearer_auth(&alice.token)
        .json(&json!({ "assistant_id": bob_assistant_id, "question": "Still mine?" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["question"], "Still mine?");
    assert_eq!(body["data"]["assistant_id"], assistant_id);
    Ok(())
}

#[tokio::test]
async fn page_ownership_resolves_through_website() -> Result<()> {
    let server = common::ensure_server().await?;
    let Some(pool) = common::db_pool().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let alice = common::register_account(&server.base_url).await?;
    let bob = common::register_account(&server.base_url).await?;
    let assistant_id = common::create_assistant(&server.base_url, &alice.token, "Crawler").await?;

    let res = client
        .post(format!("{}/api/assistants/{}/websites", server.base_url, assistant_id))
        .bearer_auth(&alice.token)
        .json(&json!({ "domain": "docs.example.com" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let website_id = res.json::<serde_json::Value>().await?["data"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Seed a crawled page the way the ingestion pipeline would
    let (page_id,): (uuid::Uuid,) = sqlx::query_as(
        "INSERT INTO website_pages (website_id, path, title, content) \
         VALUES ($1::uuid, '/about', 'About', 'hello') RETURNING id",
    )
    .bind(&website_id)
    .fetch_one(&pool)
    .await?;

    let res = client
        .get(format!("{}/api/pages/{}", server.base_url, page_id))
        .bearer_auth(&alice.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Two hops away, still invisible to another tenant
    let res = client
        .get(format!("{}/api/pages/{}", server.base_url, page_id))
        .bearer_auth(&bob.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/api/websites/{}/pages", server.base_url, website_id))
        .bearer_auth(&bob.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn whoami_reflects_the_authenticated_principal() -> Result<()> {
    let server = common::ensure_server().await?;
    if common::db_pool().await?.is_none() {
        return Ok(());
    }
    let client = reqwest::Client::new();

    let alice = common::register_account(&server.base_url).await?;

    let res = client
        .get(format!("{}/api/auth/whoami", server.base_url))
        .bearer_auth(&alice.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["email"], alice.email);
    assert!(body["data"].get("password_hash").is_none());
    Ok(())
}
