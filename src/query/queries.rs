/// 경매 목록 조회
pub const LIST_AUCTIONS: &str = "SELECT id, title, description, start_time, end_time, created_at, updated_at FROM auctions ORDER BY start_time ASC";

/// 경매 조회
pub const GET_AUCTION: &str = "SELECT id, title, description, start_time, end_time, created_at, updated_at FROM auctions WHERE id = $1";

/// 경매 생성
pub const INSERT_AUCTION: &str = r#"
    INSERT INTO auctions (id, title, description, start_time, end_time, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, now(), now())
    RETURNING id, title, description, start_time, end_time, created_at, updated_at
"#;

/// 경매 상품 목록 조회
pub const LIST_ITEMS: &str = r#"
    SELECT id, auction_id, title, description, image_url, starting_price, current_price, created_at, updated_at
    FROM auction_items
    WHERE auction_id = $1
    ORDER BY created_at ASC
"#;

/// 상품 조회
pub const GET_ITEM: &str = r#"
    SELECT id, auction_id, title, description, image_url, starting_price, current_price, created_at, updated_at
    FROM auction_items
    WHERE id = $1
"#;

/// 상품 생성
pub const INSERT_ITEM: &str = r#"
    INSERT INTO auction_items (id, auction_id, title, description, image_url, starting_price, current_price, created_at, updated_at)
    VALUES ($1, $2, $3, $4, $5, $6, NULL, now(), now())
    RETURNING id, auction_id, title, description, image_url, starting_price, current_price, created_at, updated_at
"#;

/// 최고 입찰가 조회
pub const GET_HIGHEST_BID: &str =
    "SELECT MAX(amount) AS highest_bid FROM bids WHERE item_id = $1";

/// 입찰 이력 조회 (금액 내림차순, 동일 금액은 먼저 들어온 순)
pub const GET_HIGHEST_BIDS: &str = r#"
    SELECT b.id, b.item_id, b.bidder_id, u.name AS bidder_name, b.amount, b.created_at
    FROM bids b
    LEFT JOIN users u ON u.id = b.bidder_id
    WHERE b.item_id = $1
    ORDER BY b.amount DESC, b.created_at ASC
"#;

/// 현재 가격 조건부 업데이트 (읽은 가격 그대로일 때만)
pub const UPDATE_ITEM_CURRENT_PRICE: &str = r#"
    UPDATE auction_items
    SET current_price = $2, updated_at = $4
    WHERE id = $1
      AND current_price IS NOT DISTINCT FROM $3
      AND $2 > COALESCE(current_price, starting_price)
    RETURNING current_price
"#;

/// 입찰 기록 추가
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (id, item_id, bidder_id, amount, created_at)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id, item_id, bidder_id, amount, created_at
"#;

/// 전화번호 인증 생성 또는 초기화
pub const UPSERT_PHONE_VERIFICATION: &str = r#"
    INSERT INTO phone_verifications (phone_number, user_id, verified, updated_at)
    VALUES ($1, $2, FALSE, now())
    ON CONFLICT (phone_number)
    DO UPDATE SET user_id = EXCLUDED.user_id, verified = FALSE, updated_at = now()
    RETURNING phone_number, user_id, verified, updated_at
"#;

/// 전화번호 인증 완료 처리
pub const MARK_PHONE_VERIFIED: &str = r#"
    INSERT INTO phone_verifications (phone_number, user_id, verified, updated_at)
    VALUES ($1, $2, TRUE, now())
    ON CONFLICT (phone_number)
    DO UPDATE SET user_id = EXCLUDED.user_id, verified = TRUE, updated_at = now()
    RETURNING phone_number, user_id, verified, updated_at
"#;

/// 전화번호 인증 조회
pub const GET_PHONE_VERIFICATION: &str = "SELECT phone_number, user_id, verified, updated_at FROM phone_verifications WHERE phone_number = $1";

/// 전화번호로 사용자 생성 또는 조회 (이름이 주어지면 갱신)
pub const UPSERT_USER: &str = r#"
    INSERT INTO users (id, phone_number, name, created_at)
    VALUES ($1, $2, $3, now())
    ON CONFLICT (phone_number)
    DO UPDATE SET name = COALESCE(EXCLUDED.name, users.name)
    RETURNING id, phone_number, name, created_at
"#;
