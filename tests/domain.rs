use chrono::{Duration, Utc};
use techstore_api::{
    dto::{
        sav::{CreateSavTicketRequest, SavTicketType},
        suggestions::{CreateSuggestionRequest, SuggestionCategory},
    },
    models::{OrderStatus, PromoCode, SavTicketStatus},
    services::{
        order_service::{build_order_number, shipping_cost_for},
        promo_service::discount_for,
        sav_service::build_ticket_number,
    },
};
use uuid::Uuid;
use validator::Validate;

fn promo(percent: Option<i32>, amount: Option<i64>) -> PromoCode {
    PromoCode {
        id: Uuid::new_v4(),
        code: "TEST".into(),
        description: None,
        discount_percent: percent,
        discount_amount: amount,
        min_order_amount: None,
        valid_from: Utc::now() - Duration::days(1),
        valid_until: Utc::now() + Duration::days(1),
        is_active: true,
        usage_limit: None,
        usage_count: 0,
        created_at: Utc::now(),
    }
}

#[test]
fn order_number_has_date_and_hex_suffix() {
    let id = Uuid::new_v4();
    let number = build_order_number(id);
    let parts: Vec<&str> = number.split('-').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "CMD");
    assert_eq!(parts[1].len(), 8);
    assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
    assert_eq!(parts[2].len(), 8);
    assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn order_numbers_differ_per_order() {
    assert_ne!(
        build_order_number(Uuid::new_v4()),
        build_order_number(Uuid::new_v4())
    );
}

#[test]
fn ticket_number_has_sav_prefix() {
    let number = build_ticket_number(Uuid::new_v4());
    assert!(number.starts_with("SAV-"));
}

#[test]
fn shipping_is_flat_and_skipped_for_zero_subtotal() {
    assert_eq!(shipping_cost_for(0, 5_000), 0);
    assert_eq!(shipping_cost_for(1, 5_000), 5_000);
    assert_eq!(shipping_cost_for(1_000_000, 5_000), 5_000);
}

#[test]
fn percent_discount_rounds_down() {
    let p = promo(Some(10), None);
    assert_eq!(discount_for(&p, 20_000), 2_000);
    assert_eq!(discount_for(&p, 15), 1);
}

#[test]
fn fixed_amount_wins_over_percent() {
    let p = promo(Some(10), Some(3_000));
    assert_eq!(discount_for(&p, 20_000), 3_000);
}

#[test]
fn discount_never_exceeds_base() {
    let p = promo(None, Some(50_000));
    assert_eq!(discount_for(&p, 20_000), 20_000);
}

#[test]
fn promo_without_discount_fields_gives_nothing() {
    let p = promo(None, None);
    assert_eq!(discount_for(&p, 20_000), 0);
}

#[test]
fn order_status_moves_forward_only() {
    assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Confirmed));
    assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Delivered));
    assert!(OrderStatus::Processing.can_transition_to(OrderStatus::Shipped));
    assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Confirmed));
    assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
}

#[test]
fn cancellation_allowed_from_any_live_status() {
    assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
    assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
}

#[test]
fn terminal_orders_are_frozen() {
    for next in [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ] {
        assert!(!OrderStatus::Delivered.can_transition_to(next));
        assert!(!OrderStatus::Cancelled.can_transition_to(next));
    }
}

#[test]
fn ticket_status_moves_forward_only() {
    assert!(SavTicketStatus::Pending.can_transition_to(SavTicketStatus::InProgress));
    assert!(SavTicketStatus::Pending.can_transition_to(SavTicketStatus::Closed));
    assert!(SavTicketStatus::InProgress.can_transition_to(SavTicketStatus::Resolved));
    assert!(!SavTicketStatus::Resolved.can_transition_to(SavTicketStatus::InProgress));
    assert!(!SavTicketStatus::Closed.can_transition_to(SavTicketStatus::Pending));
}

#[test]
fn ticket_description_must_be_ten_chars() {
    let request = |description: &str| CreateSavTicketRequest {
        order_id: Uuid::new_v4(),
        order_item_id: Uuid::new_v4(),
        ticket_type: SavTicketType::Other,
        description: description.to_string(),
    };
    assert!(request("123456789").validate().is_err());
    assert!(request("1234567890").validate().is_ok());
}

#[test]
fn suggestion_email_and_message_are_checked() {
    let request = |email: &str, message: &str| CreateSuggestionRequest {
        name: None,
        email: email.to_string(),
        subject: "Livraison".to_string(),
        category: SuggestionCategory::Delivery,
        message: message.to_string(),
    };
    assert!(request("not-an-email", "Un message assez long.").validate().is_err());
    assert!(request("awa@example.com", "court").validate().is_err());
    assert!(request("awa@example.com", "Un message assez long.").validate().is_ok());
}

#[test]
fn status_strings_round_trip() {
    for s in ["pending", "confirmed", "processing", "shipped", "delivered", "cancelled"] {
        assert_eq!(OrderStatus::parse(s).map(|v| v.as_str()), Some(s));
    }
    assert!(OrderStatus::parse("paid").is_none());
    for s in ["pending", "in_progress", "resolved", "closed"] {
        assert_eq!(SavTicketStatus::parse(s).map(|v| v.as_str()), Some(s));
    }
    assert!(SavTicketStatus::parse("open").is_none());
}
