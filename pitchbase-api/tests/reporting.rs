mod common;

use common::*;
use pitchbase_booking::SlotRequest;
use pitchbase_payment::PaymentMethod;
use pitchbase_reporting::DateRange;

#[tokio::test]
async fn revenue_counts_completed_payments_in_the_window() {
    let env = env();
    let turf = active_turf(&env, 2000).await;

    let b1 = env
        .bookings
        .create_booking(
            &player("player-1"),
            draft_for(turf.id, SlotRequest::Range(range("10:00", "11:00")), 1),
        )
        .await
        .unwrap();
    env.bookings
        .record_payment(b1.id, 2000, PaymentMethod::Card)
        .await
        .unwrap();

    // Partially paid booking contributes only its completed amount.
    let b2 = env
        .bookings
        .create_booking(
            &player("player-2"),
            draft_for(turf.id, SlotRequest::Range(range("12:00", "13:00")), 1),
        )
        .await
        .unwrap();
    env.bookings
        .record_payment(b2.id, 500, PaymentMethod::Cash)
        .await
        .unwrap();

    // Open (pending) attempt never counts as revenue.
    env.bookings
        .open_payment(b2.id, 1000, PaymentMethod::Card)
        .await
        .unwrap();

    let window = DateRange {
        from: date(),
        to: date(),
    };
    let revenue = env.reports.revenue_for_owner("owner-1", window).await.unwrap();
    assert_eq!(revenue, 2500);

    // A window that misses the booking date reports nothing.
    let empty = DateRange {
        from: date().succ_opt().unwrap(),
        to: date().succ_opt().unwrap(),
    };
    assert_eq!(
        env.reports.revenue_for_owner("owner-1", empty).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn occupancy_is_booked_over_calendar_slot_time() {
    let env = env();
    let turf = active_turf(&env, 2000).await;

    let s1 = env
        .catalog
        .add_time_slot(&owner(), turf.id, date(), range("10:00", "11:00"), None)
        .await
        .unwrap();
    env.catalog
        .add_time_slot(&owner(), turf.id, date(), range("11:00", "12:00"), None)
        .await
        .unwrap();

    env.bookings
        .create_booking(&player("player-1"), draft_for(turf.id, SlotRequest::Slot(s1.id), 1))
        .await
        .unwrap();

    let window = DateRange {
        from: date(),
        to: date(),
    };
    let occupancy = env.reports.occupancy_for_turf(turf.id, window).await.unwrap();
    assert!((occupancy - 0.5).abs() < f64::EPSILON);
}

#[tokio::test]
async fn occupancy_is_zero_without_slots() {
    let env = env();
    let turf = active_turf(&env, 2000).await;
    let window = DateRange {
        from: date(),
        to: date(),
    };
    assert_eq!(
        env.reports.occupancy_for_turf(turf.id, window).await.unwrap(),
        0.0
    );
}

#[tokio::test]
async fn customer_rollup_groups_by_player_and_counts_confirmed_spend() {
    let env = env();
    let turf = active_turf(&env, 2000).await;

    let b1 = env
        .bookings
        .create_booking(
            &player("player-1"),
            draft_for(turf.id, SlotRequest::Range(range("10:00", "11:00")), 1),
        )
        .await
        .unwrap();
    env.bookings.accept_booking(&owner(), b1.id).await.unwrap();

    // Second booking by the same player, left pending: counted, not spent.
    env.bookings
        .create_booking(
            &player("player-1"),
            draft_for(turf.id, SlotRequest::Range(range("12:00", "13:00")), 1),
        )
        .await
        .unwrap();

    env.bookings
        .create_booking(
            &player("player-2"),
            draft_for(turf.id, SlotRequest::Range(range("14:00", "15:00")), 1),
        )
        .await
        .unwrap();

    let rollups = env.reports.customer_rollup("owner-1").await.unwrap();
    assert_eq!(rollups.len(), 2);

    // Sorted by confirmed spend, highest first.
    assert_eq!(rollups[0].player_id, "player-1");
    assert_eq!(rollups[0].total_bookings, 2);
    assert_eq!(rollups[0].total_spent, 2000);
    assert_eq!(rollups[0].last_booking_date, date());

    assert_eq!(rollups[1].player_id, "player-2");
    assert_eq!(rollups[1].total_bookings, 1);
    assert_eq!(rollups[1].total_spent, 0);
}
