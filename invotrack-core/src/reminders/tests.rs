use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::models::{Currency, InvoiceStatus, NewInvoice};
use crate::reminders::classify::totals_by_currency;
use crate::reminders::dispatch::{category_notification, ReminderDispatcher};
use crate::reminders::scheduler::ReminderScheduler;
use crate::reminders::urgency::DueCategory;
use crate::test_support::{date, fixture, fixture_with, request, today, RecordingNotifier};

/// Polls until the notifier has recorded at least `count` notifications.
async fn wait_for(notifier: &RecordingNotifier, count: usize) -> bool {
    for _ in 0..200 {
        if notifier.sent().len() >= count {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

#[test]
fn test_category_notification_totals_per_currency() {
    let mut fx = fixture();
    fx.store
        .add_invoice(request("Acme", 1_000_000, InvoiceStatus::NotPaid, date(2024, 1, 2)))
        .unwrap();
    fx.store
        .add_invoice(
            NewInvoice::with_defaults("Globex", Decimal::from(250), Currency::Usd, today())
                .status(InvoiceStatus::NotPaid)
                .due_date(date(2024, 1, 9)),
        )
        .unwrap();
    fx.store
        .add_invoice(request("Initech", 500_000, InvoiceStatus::NotPaid, date(2024, 1, 5)))
        .unwrap();

    let sweep = fx.store.sweep_due_dates();
    assert_eq!(sweep.overdue.len(), 3);
    assert_eq!(
        totals_by_currency(&sweep.overdue),
        vec![
            (Currency::Idr, Decimal::from(1_500_000)),
            (Currency::Usd, Decimal::from(250)),
        ]
    );

    let notification = category_notification(DueCategory::Overdue, &sweep.overdue);
    assert_eq!(notification.title, "Invoices Overdue!");
    assert_eq!(
        notification.body,
        "3 invoices past the due date.\nTotal: Rp 1.500.000 + US$ 250,00"
    );
    assert_eq!(notification.dedupe_key, "invoice-overdue");
    assert_eq!(notification.category, "overdue");
}

#[test]
fn test_currency_totals_clamp_at_max() {
    let mut fx = fixture();
    fx.store
        .add_invoice(request("Acme", 10, InvoiceStatus::NotPaid, date(2024, 1, 2)))
        .unwrap();
    fx.store
        .add_invoice(request("Globex", 10, InvoiceStatus::NotPaid, date(2024, 1, 3)))
        .unwrap();

    let mut overdue = fx.store.sweep_due_dates().overdue;
    for invoice in &mut overdue {
        invoice.amount = Decimal::MAX;
    }

    assert_eq!(totals_by_currency(&overdue), vec![(Currency::Idr, Decimal::MAX)]);
    assert!(category_notification(DueCategory::Overdue, &overdue)
        .body
        .starts_with("2 invoices past the due date."));
}

#[test]
fn test_dispatch_one_notification_per_category() {
    let mut fx = fixture();
    fx.store
        .add_invoice(request("Late", 10, InvoiceStatus::NotPaid, date(2024, 1, 9)))
        .unwrap();
    fx.store
        .add_invoice(request("Soon", 10, InvoiceStatus::NotPaid, date(2024, 1, 12)))
        .unwrap();
    fx.store
        .add_invoice(request("Soon too", 10, InvoiceStatus::InProgress, date(2024, 1, 13)))
        .unwrap();

    let dispatcher = ReminderDispatcher::new(fx.notifier.clone());
    let delivered = dispatcher.dispatch(&fx.store.sweep_due_dates());

    assert_eq!(delivered, 2);
    let keys: Vec<_> = fx.notifier.sent().into_iter().map(|n| n.dedupe_key).collect();
    assert_eq!(keys, vec!["invoice-overdue", "invoice-due-soon"]);
    assert!(fx.notifier.sent()[1].body.starts_with("2 invoices due this week."));
}

#[test]
fn test_dispatch_swallows_notifier_errors() {
    let mut fx = fixture_with(Arc::default(), Arc::new(RecordingNotifier::failing()));
    fx.store
        .add_invoice(request("Late", 10, InvoiceStatus::NotPaid, date(2024, 1, 9)))
        .unwrap();

    let dispatcher = ReminderDispatcher::new(fx.notifier.clone());

    assert_eq!(dispatcher.dispatch(&fx.store.sweep_due_dates()), 0);
}

#[test]
fn test_dispatch_nothing_when_all_paid() {
    let mut fx = fixture();
    let invoice = fx
        .store
        .add_invoice(request("Late", 10, InvoiceStatus::NotPaid, date(2024, 1, 9)))
        .unwrap();
    fx.store.mark_as_paid(&invoice.id).unwrap();

    let dispatcher = ReminderDispatcher::new(fx.notifier.clone());

    assert_eq!(dispatcher.dispatch(&fx.store.sweep_due_dates()), 0);
    assert!(fx.notifier.sent().is_empty());
}

#[tokio::test]
async fn test_scheduler_sweeps_on_start_and_on_demand() {
    let mut fx = fixture();
    fx.store
        .add_invoice(request("Late", 10, InvoiceStatus::NotPaid, date(2024, 1, 3)))
        .unwrap();
    let notifier = fx.notifier.clone();
    let storage = fx.storage.clone();
    let before = storage.raw();
    let shared = fx.store.into_shared();

    let handle = ReminderScheduler::new(shared.clone(), notifier.clone(), None).spawn();

    assert!(wait_for(&notifier, 1).await, "Startup sweep should notify");

    handle.check_now();
    assert!(wait_for(&notifier, 2).await, "On-demand sweep should notify");

    handle.shutdown().await.expect("Scheduler task should stop cleanly");

    let sent = notifier.sent();
    assert_eq!(sent[0], sent[1], "Repeated sweeps reuse the same dedupe key");
    assert_eq!(storage.raw(), before, "Sweeps never write");
    assert!(!shared.lock().await.invoices()[0].reminder_sent);
}

#[tokio::test]
async fn test_scheduler_sweep_once_sees_mutations() {
    let fx = fixture();
    let notifier = fx.notifier.clone();
    let shared = fx.store.into_shared();
    let scheduler = ReminderScheduler::new(shared.clone(), notifier.clone(), Some(Duration::from_secs(60)));

    assert_eq!(scheduler.sweep_once().await, 0);

    let invoice = shared
        .lock()
        .await
        .add_invoice(request("Soon", 10, InvoiceStatus::NotPaid, date(2024, 1, 15)))
        .unwrap();
    assert_eq!(scheduler.sweep_once().await, 1);
    assert_eq!(notifier.sent()[0].dedupe_key, "invoice-due-soon");

    shared.lock().await.mark_as_paid(&invoice.id).unwrap();
    assert_eq!(scheduler.sweep_once().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_sweeps_on_each_interval_tick() {
    let mut fx = fixture();
    fx.store
        .add_invoice(request("Late", 10, InvoiceStatus::NotPaid, date(2024, 1, 3)))
        .unwrap();
    let notifier = fx.notifier.clone();
    let shared = fx.store.into_shared();

    let handle =
        ReminderScheduler::new(shared, notifier.clone(), Some(Duration::from_secs(60))).spawn();
    assert!(wait_for(&notifier, 1).await, "Startup sweep should notify");

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(notifier.sent().len(), 1, "No sweep before the interval elapses");

    tokio::time::sleep(Duration::from_secs(31)).await;
    assert!(wait_for(&notifier, 2).await, "Interval tick should sweep again");
    assert_eq!(notifier.sent().len(), 2);

    handle.shutdown().await.expect("Scheduler task should stop cleanly");
}
