//! Router-level tests against an in-memory database.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use sms_dashboard::config::AppConfig;
use sms_dashboard::db::queries::{audit, contact, message};
use sms_dashboard::db::{create_memory_pool, init_schema, DbPool};
use sms_dashboard::routes::build_router;
use sms_dashboard::state::AppState;
use sms_dashboard::template::Views;

const TOKEN: &str = "test-token";

async fn app() -> (Router, DbPool) {
    let pool = tokio_test::assert_ok!(create_memory_pool().await);
    tokio_test::assert_ok!(init_schema(&pool).await);

    let config = AppConfig {
        admin_token: TOKEN.to_string(),
        public_base_url: "https://sms.example.com".to_string(),
        ..AppConfig::default()
    };
    let state = AppState::new(pool.clone(), config, Views::new().unwrap());
    (build_router(state), pool)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let (app, _) = app().await;

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn admin_pages_require_token() {
    let (app, _) = app().await;

    for uri in ["/dashboard", "/contacts", "/campaigns", "/dashboard?token=wrong", "/api/audit"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let response = app
        .oneshot(post_form("/contacts/add", "phone=%2B254700000001"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_accepted_from_query_or_header() {
    let (app, _) = app().await;

    let response = app
        .clone()
        .oneshot(get(&format!("/dashboard?token={TOKEN}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = Request::builder()
        .uri("/api/dashboard/stats")
        .header("x-admin-token", TOKEN)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn home_redirects_valid_token_to_dashboard() {
    let (app, _) = app().await;

    let response = app
        .clone()
        .oneshot(get(&format!("/?token={TOKEN}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        format!("/dashboard?token={TOKEN}").as_str()
    );

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Admin token"));
}

#[tokio::test]
async fn add_contact_redirects_and_persists() {
    let (app, pool) = app().await;

    let response = app
        .oneshot(post_form(
            &format!("/contacts/add?token={TOKEN}"),
            "name=Amina&phone=%2B254+700+000+001&tags=vip&consented=1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        format!("/contacts?token={TOKEN}").as_str()
    );

    let stored = contact::get_by_phone(&pool, "+254700000001")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "Amina");
    assert!(stored.consented);
}

#[tokio::test]
async fn add_contact_with_invalid_phone_is_rejected() {
    let (app, _) = app().await;

    let response = app
        .oneshot(post_form(
            &format!("/contacts/add?token={TOKEN}"),
            "name=Bad&phone=call-me",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn csv_upload_imports_contacts() {
    let (app, pool) = app().await;
    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"contacts.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         phone,name,consented,tags\n+254700000001,Ann,yes,vip\n+254700000002,Ben,0,\nnot-a-phone,Cy,1,\n\r\n\
         --{boundary}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri(format!("/contacts/import_csv?token={TOKEN}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert_eq!(
        location,
        format!("/contacts?token={TOKEN}&imported=2&rejected=1")
    );
    assert_eq!(contact::count_all(&pool).await.unwrap(), 2);

    let response = app.oneshot(get(&location)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("Imported 2 contacts, 1 rejected."));
}

#[tokio::test]
async fn campaign_lifecycle_over_http() {
    let (app, pool) = app().await;

    app.clone()
        .oneshot(post_form(
            &format!("/contacts/add?token={TOKEN}"),
            "name=Amina&phone=%2B254700000001&consented=on",
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_form(
            &format!("/campaigns/create?token={TOKEN}"),
            "name=Launch&message_template=Hi+%7B%7Bname%7D%7D&target_tag=",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let start = format!("/campaigns/1/start?token={TOKEN}");
    let response = app.clone().oneshot(post_form(&start, "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app.clone().oneshot(post_form(&start, "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(post_form(&format!("/campaigns/99/start?token={TOKEN}"), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let queued = message::list_for_campaign(&pool, 1, 10).await.unwrap();
    assert_eq!(queued.len(), 1);
    assert_eq!(
        queued[0].body,
        "Hi Amina\nOpt out: https://sms.example.com/u/+254700000001"
    );

    let response = app
        .oneshot(get(&format!("/campaigns/1/stats?token={TOKEN}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Launch"));
    assert!(page.contains("queued"));
}

#[tokio::test]
async fn public_unsubscribe_needs_no_token() {
    let (app, pool) = app().await;
    app.clone()
        .oneshot(post_form(
            &format!("/contacts/add?token={TOKEN}"),
            "phone=%2B254700000001&consented=1",
        ))
        .await
        .unwrap();

    let response = app.oneshot(get("/u/+254700000001")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("+254700000001"));

    let stored = contact::get_by_phone(&pool, "+254700000001")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.opted_out);
}

#[tokio::test]
async fn admin_opt_out_redirects_and_marks_contact() {
    let (app, pool) = app().await;
    app.clone()
        .oneshot(post_form(
            &format!("/contacts/add?token={TOKEN}"),
            "phone=%2B254700000001&consented=1",
        ))
        .await
        .unwrap();
    let stored = contact::get_by_phone(&pool, "+254700000001")
        .await
        .unwrap()
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_form(
            &format!("/contacts/{}/optout?token={TOKEN}", stored.id),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()[header::LOCATION],
        format!("/contacts?token={TOKEN}").as_str()
    );
    let stored = contact::get_by_phone(&pool, "+254700000001")
        .await
        .unwrap()
        .unwrap();
    assert!(stored.opted_out);

    let response = app
        .oneshot(post_form(&format!("/contacts/999/optout?token={TOKEN}"), ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn audit_api_lists_newest_first() {
    let (app, pool) = app().await;
    audit::insert(&pool, "first", "a").await.unwrap();
    audit::insert(&pool, "second", "b").await.unwrap();
    audit::insert(&pool, "third", "c").await.unwrap();

    let response = app
        .oneshot(get(&format!("/api/audit?token={TOKEN}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    let actions: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn dashboard_stats_api_reports_totals() {
    let (app, _) = app().await;
    for form in [
        "phone=%2B254700000001&consented=1",
        "phone=%2B254700000002&consented=1",
    ] {
        app.clone()
            .oneshot(post_form(&format!("/contacts/add?token={TOKEN}"), form))
            .await
            .unwrap();
    }
    app.clone()
        .oneshot(get("/u/+254700000002"))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_form(
            &format!("/campaigns/create?token={TOKEN}"),
            "name=Launch&message_template=Hello",
        ))
        .await
        .unwrap();
    app.clone()
        .oneshot(post_form(&format!("/campaigns/1/start?token={TOKEN}"), ""))
        .await
        .unwrap();

    let response = app
        .oneshot(get(&format!("/api/dashboard/stats?token={TOKEN}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "contacts": 2,
            "opted_out": 1,
            "campaigns": 1,
            "messages": { "queued": 1 }
        })
    );
}
