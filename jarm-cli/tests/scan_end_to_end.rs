//! End-to-end coverage of the CLI's scan path against mocked transports —
//! no real sockets, no real TLS, no network access.

use std::sync::Arc;

use clap::Parser;
use jarm_cli::cli::Cli;
use jarm_cli::transport::mock::{LoopbackResolver, ScriptedTransport};
use jarm_cli::transport::{Resolver, Transport};
use jarm_core::random::{FixedGreaseChooser, FixedRandomSource, GreaseChooser, RandomSource};

fn minimal_server_hello(cipher: [u8; 2], version: [u8; 2]) -> Vec<u8> {
    let counter = 0u8;
    let mut buf = vec![0u8; 49 + counter as usize];
    buf[0] = 0x16;
    buf[5] = 0x02;
    buf[9] = version[0];
    buf[10] = version[1];
    buf[43] = counter;
    buf[counter as usize + 44] = cipher[0];
    buf[counter as usize + 45] = cipher[1];
    buf[counter as usize + 47] = 0x00;
    buf[counter as usize + 48] = 0x00;
    buf
}

#[tokio::test]
async fn scan_with_no_target_argument_is_rejected_before_any_network_activity() {
    let cli = Cli::try_parse_from(["jarm"]).expect_err("clap should reject a missing target");
    assert!(cli.to_string().contains("target") || cli.to_string().contains("required"));
}

#[tokio::test]
async fn scan_produces_a_non_trivial_jarm_when_every_probe_gets_a_server_hello() {
    let cli = Cli::parse_from(["jarm", "example.com:443", "--suppress"]);

    let response = minimal_server_hello([0x00, 0x2f], [0x03, 0x03]);
    let responses = std::iter::repeat(response).take(10).collect();

    let resolver: Arc<dyn Resolver> = Arc::new(LoopbackResolver);
    let transport: Arc<dyn Transport> = Arc::new(ScriptedTransport::new(responses));
    let random: Arc<dyn RandomSource> = Arc::new(FixedRandomSource::new(vec![0x11; 32]));
    let grease: Arc<dyn GreaseChooser> = Arc::new(FixedGreaseChooser(0x0a0a));

    jarm_cli::run_with(cli, resolver, transport, random, grease)
        .await
        .expect("scan against mocked transport should not error");
}

#[tokio::test]
async fn scan_against_a_silent_target_assembles_to_the_all_zero_sentinel() {
    let cli = Cli::parse_from(["jarm", "example.com:443", "--suppress"]);

    let resolver: Arc<dyn Resolver> = Arc::new(LoopbackResolver);
    let transport: Arc<dyn Transport> = Arc::new(ScriptedTransport::new(vec![]));
    let random: Arc<dyn RandomSource> = Arc::new(FixedRandomSource::new(vec![0x11; 32]));
    let grease: Arc<dyn GreaseChooser> = Arc::new(FixedGreaseChooser(0x0a0a));

    jarm_cli::run_with(cli, resolver, transport, random, grease).await.unwrap();
}

#[tokio::test]
async fn scan_writes_a_csv_file_when_output_is_requested() {
    let tmp = std::env::temp_dir().join(format!("jarm-test-{}.csv", std::process::id()));
    let cli = Cli::parse_from([
        "jarm",
        "example.com:443",
        "--suppress",
        "-o",
        tmp.to_str().unwrap(),
    ]);

    let resolver: Arc<dyn Resolver> = Arc::new(LoopbackResolver);
    let transport: Arc<dyn Transport> = Arc::new(ScriptedTransport::new(vec![]));
    let random: Arc<dyn RandomSource> = Arc::new(FixedRandomSource::new(vec![0x11; 32]));
    let grease: Arc<dyn GreaseChooser> = Arc::new(FixedGreaseChooser(0x0a0a));

    jarm_cli::run_with(cli, resolver, transport, random, grease).await.unwrap();

    let contents = std::fs::read_to_string(&tmp).unwrap();
    assert!(contents.starts_with("Host,Port,JARM,ScanTime"));
    assert!(contents.contains("example.com,443,"));
    std::fs::remove_file(&tmp).ok();
}
