//! Captured xCAT responses from a zHCP node named `zhcpos2`

pub(crate) const NODE: &str = "zhcpos2";

pub(crate) const PAGE_DATA: &str = r#"{"data":[{"data":["zhcpos2: Total allocated: 93920K\nzhcpos2: Total used: 33106\nzhcpos2: Available percentage: 1\nzhcpos2: Volume ID: OSPA35\nzhcpos2: RDEV: ED27\nzhcpos2: Volume total pages: 2560K\nzhcpos2: Volume pages in use: 834\nzhcpos2: Available percentage: 1\nzhcpos2: Drain: NOTDRAINED\nzhcpos2: Drain: NOTDRAINED\nzhcpos2: ERROR: The volume ID of the paging volume is NULL",null]},{"errorcode":["0"]}]}"#;

pub(crate) const SPOOL_DATA: &str = r#"{"data":[{"data":["zhcpos2: \nzhcpos2: Total allocated: 12001K\nzhcpos2: Total used: 4837K\nzhcpos2: Available percentage: 40\nzhcpos2:   Volume ID: OS263S\nzhcpos2:   RDEV: 5381\nzhcpos2:   Volume total pages: 1761K\nzhcpos2:   Volume pages in use: 584468\nzhcpos2:   Available percentage: 32\nzhcpos2:   Dump: NOTDUMP\nzhcpos2:   Drain: NOTDRAINED",null]},{"errorcode":["0"]}]}"#;

pub(crate) const CPU_MEMORY_DATA: &str = r#"{"data":[{"data":["zhcpos2: CPU_COUNT=32\nzhcpos2: CPU_AVERAGE_USE=2.125%\nzhcpos2: PAGING_RATE=0\nzhcpos2: MEMORY_IN_USE=4219345\nzhcpos2: MEMORY_TOTAL=78643200\nzhcpos2: MONITOR_RATE=2.00 SECONDS \nzhcpos2: MONITOR_INTERVAL=1 MINUTES \nzhcpos2: MONITOR_EVENT_COUNT=11\nzhcpos2: DOMAIN_MONITOR=ENABLED\nzhcpos2: DOMAIN_PROCESSOR=DISABLED\nzhcpos2: DOMAIN_STORAGE=ENABLED\nzhcpos2: DOMAIN_SCHEDULER=DISABLED\nzhcpos2: DOMAIN_SEEKS=DISABLED\nzhcpos2: DOMAIN_USER=DISABLED\nzhcpos2: DOMAIN_I/O=ENABLED\nzhcpos2: DOMAIN_NETWORK=ENABLED\nzhcpos2: DOMAIN_ISFC=ENABLED\nzhcpos2: DOMAIN_APPLDATA=DISABLED\nzhcpos2: DOMAIN_SSI=DISABLED",null]},{"errorcode":["0"]}]}"#;

pub(crate) const DISK_DEF_DATA: &str = r#"{"data":[{"data":["zhcpos2: OS2P01 3390-64K 65520 OS2P01\nzhcpos2: OS2P02 3390-64K 65520 OS2P02\nzhcpos2: OS2P03 3390-64K 65520 OS2P03",null]},{"errorcode":["0"]}]}"#;

pub(crate) const DISK_FREE_DATA: &str = r#"{"data":[{"data":["zhcpos2: $$$$$$ ???? 1 500 * *\nzhcpos2: $$$$$$ ???? 503 382 * *\nzhcpos2: OS2P01 3390-64K 6677 58843 * *\nzhcpos2: OS2P02 3390-64K 1 65519 * *"]},{"errorcode":["0"]}]}"#;

/// Failed query: empty payload with a null auxiliary member
pub(crate) const EMPTY_DATA_NULL: &str = r#"{"data":[{"data":["",null]},{"errorcode":["1"]}]}"#;

/// Failed query: empty payload, empty auxiliary member and empty error code
pub(crate) const EMPTY_DATA_BLANK: &str = r#"{"data":[{"data":["",""]},{"errorcode":[""]}]}"#;
