use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use bid_ledger::handlers;
use bid_ledger::identity::otp::DevOtpProvider;
use bid_ledger::identity::session::SessionStore;
use bid_ledger::message_broker::NoopPublisher;
use bid_ledger::state::AppState;
use bid_ledger::store::InMemoryStore;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const DEV_CODE: &str = "654321";

/// 인메모리 저장소와 개발용 인증 코드로 라우터 생성
fn setup() -> Router {
    let state = AppState::new(
        Arc::new(InMemoryStore::new()),
        Arc::new(SessionStore::new(24)),
        Arc::new(DevOtpProvider::new(DEV_CODE)),
        Arc::new(NoopPublisher),
    );
    handlers::routes(state)
}

/// 요청 전송 후 상태 코드와 JSON 바디 반환
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => s.parse().unwrap(),
        other => other.to_string().parse().unwrap(),
    }
}

/// 전화번호 인증으로 세션 토큰 발급
async fn sign_in(app: &Router, phone: &str, name: &str) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/auth/otp",
        None,
        Some(json!({ "phone_number": phone })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        app,
        "POST",
        "/auth/verify",
        None,
        Some(json!({ "phone_number": phone, "code": DEV_CODE, "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

/// 진행 중인 경매와 시작가 100 상품 생성, 상품 id 반환
async fn create_open_item(app: &Router, token: &str) -> String {
    let (status, auction) = send(
        app,
        "POST",
        "/auctions",
        Some(token),
        Some(json!({
            "title": "자선 경매",
            "description": "지역 도서관 후원",
            "start_time": Utc::now() - Duration::hours(1),
            "end_time": Utc::now() + Duration::hours(2),
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, item) = send(
        app,
        "POST",
        &format!("/auctions/{}/items", auction["id"].as_str().unwrap()),
        Some(token),
        Some(json!({
            "title": "한정판 LP",
            "starting_price": "100",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    item["id"].as_str().unwrap().to_string()
}

/// 입찰 시나리오 테스트 (95 거절, 105 수락, 105 거절, 110 수락)
#[tokio::test]
async fn test_bid_scenario() {
    let app = setup();
    let token = sign_in(&app, "+1 (415) 555-2671", "앨리스").await;
    let item_id = create_open_item(&app, &token).await;

    let (status, body) = send(
        &app,
        "POST",
        "/bids",
        Some(&token),
        Some(json!({ "item_id": item_id, "amount": "95" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "bid_too_low");
    assert_eq!(decimal(&body["reference_price"]), Decimal::from(100));

    let (status, body) = send(
        &app,
        "POST",
        "/bids",
        Some(&token),
        Some(json!({ "item_id": item_id, "amount": "105" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["new_current_price"]), Decimal::from(105));
    assert!(body["bid_id"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        "/bids",
        Some(&token),
        Some(json!({ "item_id": item_id, "amount": 105 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(decimal(&body["reference_price"]), Decimal::from(105));

    let (status, _) = send(
        &app,
        "POST",
        "/bids",
        Some(&token),
        Some(json!({ "item_id": item_id, "amount": "110" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, item) = send(&app, "GET", &format!("/items/{}", item_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&item["current_price"]), Decimal::from(110));

    let (_, highest) = send(
        &app,
        "GET",
        &format!("/items/{}/highest-bid", item_id),
        None,
        None,
    )
    .await;
    assert_eq!(decimal(&highest["highest_bid"]), Decimal::from(110));

    let (status, history) = send(
        &app,
        "GET",
        &format!("/items/{}/bids", item_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(decimal(&history[0]["amount"]), Decimal::from(110));
    assert_eq!(decimal(&history[1]["amount"]), Decimal::from(105));
    assert_eq!(history[0]["bidder_name"], "앨리스");
}

/// 로그인하지 않은 입찰은 거절
#[tokio::test]
async fn test_unauthenticated_bid() {
    let app = setup();
    let token = sign_in(&app, "+821012345678", "밥").await;
    let item_id = create_open_item(&app, &token).await;

    for bad_token in [None, Some("not-a-session")] {
        let (status, body) = send(
            &app,
            "POST",
            "/bids",
            bad_token,
            Some(json!({ "item_id": item_id, "amount": "500" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "unauthenticated");
    }

    let (_, history) = send(
        &app,
        "GET",
        &format!("/items/{}/bids", item_id),
        None,
        None,
    )
    .await;
    assert!(history.as_array().unwrap().is_empty());
}

/// 로그아웃 후 세션 사용 불가
#[tokio::test]
async fn test_sign_out_revokes_session() {
    let app = setup();
    let token = sign_in(&app, "+447911123456", "캐롤").await;
    let item_id = create_open_item(&app, &token).await;

    let (status, _) = send(&app, "POST", "/auth/sign-out", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "POST",
        "/bids",
        Some(&token),
        Some(json!({ "item_id": item_id, "amount": "150" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// 전화번호 인증 흐름 테스트
#[tokio::test]
async fn test_phone_verification_flow() {
    let app = setup();

    let (status, body) = send(
        &app,
        "POST",
        "/auth/otp",
        None,
        Some(json!({ "phone_number": "415-555-26" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phone_number"], "+41555526");

    let (status, body) = send(
        &app,
        "POST",
        "/auth/otp",
        None,
        Some(json!({ "phone_number": "0" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_phone_number");

    let (status, body) = send(&app, "GET", "/auth/phone/+41555526", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthenticated");

    let (status, body) = send(
        &app,
        "POST",
        "/auth/verify",
        None,
        Some(json!({ "phone_number": "+41555526", "code": "000000" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_otp");

    let (status, signed_in) = send(
        &app,
        "POST",
        "/auth/verify",
        None,
        Some(json!({ "phone_number": "+41555526", "code": DEV_CODE })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = signed_in["token"].as_str().unwrap();

    let (status, verified) =
        send(&app, "GET", "/auth/phone/+41555526", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["verified"], true);
    assert_eq!(verified["user_id"], signed_in["user_id"]);

    // 다른 사용자의 번호는 조회할 수 없다
    let other = sign_in(&app, "+15550000000", "데이브").await;
    let (status, _) = send(&app, "GET", "/auth/phone/+41555526", Some(&other), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/auth/phone/+15559999999", Some(token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// 해석할 수 없는 요청 바디도 JSON 에러로 응답
#[tokio::test]
async fn test_malformed_body_returns_json_error() {
    let app = setup();
    let token = sign_in(&app, "+821055551234", "에린").await;
    let item_id = create_open_item(&app, &token).await;

    let (status, body) = send(
        &app,
        "POST",
        "/bids",
        Some(&token),
        Some(json!({ "item_id": item_id, "amount": "abc" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");
    assert!(body["message"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        "/auctions",
        Some(&token),
        Some(json!({ "title": "제목만" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");

    let (_, history) = send(&app, "GET", &format!("/items/{}/bids", item_id), None, None).await;
    assert_eq!(history.as_array().unwrap().len(), 0);
}

/// 경매/상품 조회 테스트
#[tokio::test]
async fn test_catalog_queries() {
    let app = setup();
    let token = sign_in(&app, "+14155550100", "데이브").await;
    let item_id = create_open_item(&app, &token).await;

    let (status, auctions) = send(&app, "GET", "/auctions", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let auctions = auctions.as_array().unwrap();
    assert_eq!(auctions.len(), 1);
    let auction_id = auctions[0]["id"].as_str().unwrap();

    let (status, items) = send(
        &app,
        "GET",
        &format!("/auctions/{}/items", auction_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items[0]["id"], item_id.as_str());
    assert!(items[0]["current_price"].is_null());

    let missing = uuid::Uuid::new_v4();
    let (status, body) = send(&app, "GET", &format!("/auctions/{}", missing), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "auction_not_found");

    let (status, body) = send(&app, "GET", &format!("/items/{}", missing), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "item_not_found");

    let (status, body) = send(
        &app,
        "POST",
        "/bids",
        Some(&token),
        Some(json!({ "item_id": missing, "amount": "10" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "item_not_found");
}

/// 동시 입찰 테스트: 최종 가격은 가장 높은 입찰가
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bidding() {
    let app = setup();
    let token = sign_in(&app, "+14155550123", "이브").await;
    let item_id = create_open_item(&app, &token).await;

    let mut handles = vec![];
    for i in 1..=20i64 {
        let app = app.clone();
        let token = token.clone();
        let item_id = item_id.clone();
        handles.push(tokio::spawn(async move {
            let amount = Decimal::from(100 + (i * 7) % 20 + 1);
            send(
                &app,
                "POST",
                "/bids",
                Some(&token),
                Some(json!({ "item_id": item_id, "amount": amount })),
            )
            .await
        }));
    }

    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert!(
            status == StatusCode::OK
                || body["error"] == "bid_too_low"
                || body["error"] == "unavailable",
            "unexpected response: {} {}",
            status,
            body
        );
    }

    let (_, item) = send(&app, "GET", &format!("/items/{}", item_id), None, None).await;
    let (_, history) = send(
        &app,
        "GET",
        &format!("/items/{}/bids", item_id),
        None,
        None,
    )
    .await;
    let history = history.as_array().unwrap();
    assert!(!history.is_empty());
    assert_eq!(
        decimal(&item["current_price"]),
        decimal(&history[0]["amount"])
    );
}
