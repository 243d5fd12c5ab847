// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end smoke tests that spawn the real `shopfront` binary
//! against an in-process stub backend.

use shopfront_specs::{run_shopfront, shopfront_binary, StubShop};

#[tokio::test]
async fn help_prints_usage() -> anyhow::Result<()> {
    let binary = shopfront_binary();
    anyhow::ensure!(binary.exists(), "shopfront binary not found at {}", binary.display());

    let output = tokio::process::Command::new(&binary).arg("--help").output().await?;
    anyhow::ensure!(output.status.success(), "--help exited nonzero");

    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::ensure!(stdout.contains("login"), "usage should list subcommands");

    Ok(())
}

#[tokio::test]
async fn login_persists_credentials() -> anyhow::Result<()> {
    let shop = StubShop::start().await?;
    let dir = tempfile::tempdir()?;
    let creds = dir.path().join("credentials.json");

    let (ok, stdout) = run_shopfront(
        &shop.base_url(),
        &creds,
        &["login", "--username", "alice", "--password", "hunter2"],
    )
    .await?;
    anyhow::ensure!(ok, "login exited nonzero");
    anyhow::ensure!(stdout.contains("alice"), "login should confirm the account");

    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&creds)?)?;
    anyhow::ensure!(saved["accessToken"].is_string(), "access token missing from {saved}");
    anyhow::ensure!(saved["refreshToken"] == "refresh-1", "refresh token missing from {saved}");

    Ok(())
}

#[tokio::test]
async fn whoami_reads_the_stored_token() -> anyhow::Result<()> {
    let shop = StubShop::start().await?;
    let dir = tempfile::tempdir()?;
    let creds = dir.path().join("credentials.json");

    let (ok, _) = run_shopfront(
        &shop.base_url(),
        &creds,
        &["login", "--username", "alice", "--password", "hunter2"],
    )
    .await?;
    anyhow::ensure!(ok, "login exited nonzero");

    let (ok, stdout) = run_shopfront(&shop.base_url(), &creds, &["whoami"]).await?;
    anyhow::ensure!(ok, "whoami exited nonzero");
    anyhow::ensure!(stdout.contains("alice"), "whoami should show the subject: {stdout}");
    anyhow::ensure!(stdout.contains("ROLE_CUSTOMER"), "whoami should show roles: {stdout}");

    Ok(())
}

#[tokio::test]
async fn logout_clears_the_session() -> anyhow::Result<()> {
    let shop = StubShop::start().await?;
    let dir = tempfile::tempdir()?;
    let creds = dir.path().join("credentials.json");

    let (ok, _) = run_shopfront(
        &shop.base_url(),
        &creds,
        &["login", "--username", "alice", "--password", "hunter2"],
    )
    .await?;
    anyhow::ensure!(ok, "login exited nonzero");

    let (ok, _) = run_shopfront(&shop.base_url(), &creds, &["logout"]).await?;
    anyhow::ensure!(ok, "logout exited nonzero");

    let (ok, stdout) = run_shopfront(&shop.base_url(), &creds, &["whoami"]).await?;
    anyhow::ensure!(ok, "whoami exited nonzero");
    anyhow::ensure!(stdout.contains("not signed in"), "expected signed-out state: {stdout}");

    Ok(())
}

#[tokio::test]
async fn bad_login_exits_with_sign_in_hint() -> anyhow::Result<()> {
    let shop = StubShop::start().await?;
    let dir = tempfile::tempdir()?;
    let creds = dir.path().join("credentials.json");

    let (ok, _) = run_shopfront(
        &shop.base_url(),
        &creds,
        &["login", "--username", "alice", "--password", "wrong"],
    )
    .await?;
    anyhow::ensure!(!ok, "bad login should exit nonzero");

    Ok(())
}

#[tokio::test]
async fn products_list_prints_the_catalog() -> anyhow::Result<()> {
    let shop = StubShop::start().await?;
    let dir = tempfile::tempdir()?;
    let creds = dir.path().join("credentials.json");

    let (ok, stdout) = run_shopfront(&shop.base_url(), &creds, &["products", "list"]).await?;
    anyhow::ensure!(ok, "products list exited nonzero");
    anyhow::ensure!(stdout.contains("Espresso beans"), "catalog missing from {stdout}");

    Ok(())
}
