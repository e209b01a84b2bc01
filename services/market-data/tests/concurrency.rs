//! Concurrency test
//!
//! Many threads read (and therefore update) the shared store at once.
//! Every record observed, during or after the run, must be internally
//! consistent: a torn write would pair one update's price with another's
//! vwap or market cap.

use market_data::seed::SeedConfig;
use market_data::MarketService;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::thread;
use types::coin::CoinRecord;
use types::query::PageRequest;

/// Market cap and stored supply are two independent ±5% draws from the same
/// previous supply, so their ratio is bounded by 0.95/1.05 and 1.05/0.95.
fn consistent(coin: &CoinRecord) -> bool {
    let vwap_ratio = coin.vwap_24h / coin.price_usd;
    let supply_ratio = (coin.market_cap_usd / coin.price_usd) / coin.supply;
    (0.95..=1.05).contains(&vwap_ratio) && (0.90..=1.11).contains(&supply_ratio)
}

#[test]
fn test_concurrent_reads_of_the_same_coin() {
    let market = Arc::new(MarketService::seeded(&SeedConfig {
        synthetic_coins: 97,
        seed: Some(1),
    }));

    let handles: Vec<_> = (0..8u64)
        .map(|t| {
            let market = Arc::clone(&market);
            thread::spawn(move || {
                let mut rng = ChaCha8Rng::seed_from_u64(t);
                for _ in 0..500 {
                    let snap = market.snapshot("bitcoin", &mut rng).unwrap();
                    assert!(consistent(&snap));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let last = market.store().get("bitcoin").unwrap();
    assert!(consistent(&last));
}

#[test]
fn test_concurrent_list_and_detail_requests() {
    let market = Arc::new(MarketService::seeded(&SeedConfig {
        synthetic_coins: 197,
        seed: Some(2),
    }));

    let handles: Vec<_> = (0..6u64)
        .map(|t| {
            let market = Arc::clone(&market);
            thread::spawn(move || {
                let mut rng = ChaCha8Rng::seed_from_u64(100 + t);
                for i in 0..50 {
                    if t % 2 == 0 {
                        let page = market.list(&PageRequest::new(1, 100), &mut rng).unwrap();
                        assert_eq!(page.total_items, 200);
                        assert!(page.items.iter().all(consistent));
                    } else {
                        let id = format!("crypto-{}", 1 + (i * 3 + t as usize) % 197);
                        assert!(market.snapshot(&id, &mut rng).is_some());
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(market.coin_count(), 200);
}
