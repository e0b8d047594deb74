use tessera_market_lib::{
    page_window, ConfirmationTracker, MarketContext, MarketError, MarketResult, MintedRecord,
    PaymentSplit, PollOutcome, RecordEntry,
};
use tempfile::TempDir;

#[test]
fn market_context_config_and_connection_flow() -> MarketResult<()> {
    std::env::set_var("TESSERA_MARKET_ENV", "test");
    let temp_dir = TempDir::new().expect("create temp dir");

    let context = MarketContext::initialize(temp_dir.path().to_path_buf())?;
    assert!(context.paths().config_file().exists());

    let config = context.load_config()?;
    assert!(!config.network.primary_endpoint.is_empty());

    // Connection handed to workflows explicitly, never ambient
    assert!(!context.connection().is_connected());
    let err = context
        .connection()
        .account()
        .expect_err("expected missing connection error");
    assert!(matches!(err, MarketError::NotConnected));

    context.connection().connect(
        "0x00000000000000000000000000000000000000aa".to_string(),
        "0x7a69".to_string(),
    );
    assert_eq!(
        context.connection().account()?,
        "0x00000000000000000000000000000000000000aa"
    );

    context.connection().disconnect();
    assert!(!context.connection().is_connected());

    std::env::remove_var("TESSERA_MARKET_ENV");
    Ok(())
}

#[test]
fn split_and_paging_rules_hold() {
    // Fee and royalty splits accept only matched lists summing to 100
    assert!(PaymentSplit::parse("0xA,0xB", "60,40").is_ok());
    assert!(PaymentSplit::parse("0xA,0xB", "60,41").is_err());
    assert!(PaymentSplit::parse("0xA", "50,50").is_err());

    // Listing windows clamp to the available range and vanish past it
    assert_eq!(page_window(0, 10, 4).map(|w| (w.start, w.end)), Some((0, 4)));
    assert_eq!(page_window(4, 10, 35), None);
}

#[test]
fn confirmation_poll_resolves_first_outcome() {
    // Receipt visible within budget confirms immediately
    let mut tracker = ConfirmationTracker::new(3);
    assert_eq!(tracker.on_block(false), PollOutcome::Pending);
    assert_eq!(tracker.on_block(true), PollOutcome::Confirmed);

    // Budget exhaustion resolves false even if the receipt shows up late
    let mut tracker = ConfirmationTracker::new(2);
    assert_eq!(tracker.on_block(false), PollOutcome::Pending);
    assert_eq!(tracker.on_block(false), PollOutcome::Pending);
    assert_eq!(tracker.on_block(true), PollOutcome::Exhausted);
}

#[test]
fn minted_records_accumulate_with_revisions() {
    let mut entry = RecordEntry::empty("registry-key".to_string());
    entry.push(MintedRecord {
        token_id: 1,
        owner: "0x00000000000000000000000000000000000000aa".to_string(),
    });
    entry.push(MintedRecord {
        token_id: 2,
        owner: "0x00000000000000000000000000000000000000aa".to_string(),
    });

    assert_eq!(entry.revision, 2);
    assert_eq!(entry.data.len(), 2);
    assert_eq!(entry.data[1].token_id, 2);
}
