//! Singleton lifecycle: one init per process, shared read-only afterwards.
//!
//! Kept to a single test so nothing else in this binary races the init.

use std::fs;
use std::thread;

use shop_settings::settings::{self, ENV_FILE_NAME};
use shop_settings::AppError;
use tempfile::TempDir;

#[test]
fn init_once_then_shared_reads() {
    assert!(matches!(settings::get(), Err(AppError::NotInitialized)));

    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(ENV_FILE_NAME),
        "ALLOWED_HOSTS=shop.example, api.shop.example\n",
    )
    .unwrap();

    let first = settings::init(dir.path()).unwrap();
    assert_eq!(first.base_dir, dir.path());
    if std::env::var("ALLOWED_HOSTS").is_err() {
        assert_eq!(first.allowed_hosts, vec!["shop.example", "api.shop.example"]);
    }

    let again = settings::init(dir.path()).unwrap_err();
    assert!(matches!(again, AppError::AlreadyInitialized));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                let s = settings::get().unwrap();
                (s as *const _ as usize, s.allowed_hosts.clone())
            })
        })
        .collect();
    for handle in readers {
        let (addr, hosts) = handle.join().unwrap();
        assert_eq!(addr, first as *const _ as usize);
        assert_eq!(hosts, first.allowed_hosts);
    }
}
