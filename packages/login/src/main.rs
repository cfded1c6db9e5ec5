// Console driver for the OTP login flow

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use login_core::domains::auth::{AlertKind, App, Screen};
use login_core::kernel::{AppDeps, NoopSmsRetriever, OtpApiAdapter};
use login_core::Config;
use otp_api::{OtpApiClient, OtpApiOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,login_core=info,otp_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    let client = OtpApiClient::new(OtpApiOptions::new(config.api_base_url, config.api_token))
        .context("Failed to build OTP API client")?;
    let deps = AppDeps::new(
        Arc::new(OtpApiAdapter::new(Arc::new(client))),
        // No SMS auto-read on this platform
        Arc::new(NoopSmsRetriever),
    );

    let mut app = App::new(deps);
    let theme = ColorfulTheme::default();
    let mut last_tick = Instant::now();

    loop {
        match app.screen() {
            Screen::Login => {
                let mobile: String = Input::with_theme(&theme)
                    .with_prompt("Mobile number (10 digits)")
                    .interact_text()?;
                if let Some(flow) = app.login_mut() {
                    flow.set_mobile(mobile.trim());
                }
                app.submit_mobile().await;

                show_alert(&mut app);
                if let Some(err) = app.login().and_then(|f| f.error()) {
                    println!("{}", style(err).red());
                }
                if app.screen() == Screen::Verify {
                    last_tick = Instant::now();
                    println!("Enter the 4-digit OTP sent to your phone.");
                }
            }
            Screen::Verify => {
                advance_countdown(&mut app, &mut last_tick);
                app.pump_sms().await;

                let remaining = app.verify().map(|f| f.countdown()).unwrap_or(0);
                let prompt = if remaining > 0 {
                    format!("OTP digits (b = back, resend in {remaining}s)")
                } else {
                    "OTP digits (b = back, r = resend)".to_string()
                };
                let line: String = Input::with_theme(&theme)
                    .with_prompt(prompt)
                    .allow_empty(true)
                    .interact_text()?;
                advance_countdown(&mut app, &mut last_tick);

                match line.trim() {
                    "b" => app.back_to_login(),
                    "r" => app.resend_otp().await,
                    input => {
                        for c in input.chars() {
                            app.enter_digit(c).await;
                        }
                    }
                }

                show_alert(&mut app);
                if let Some(err) = app.verify().and_then(|f| f.error()) {
                    println!("{}", style(err).red());
                }
            }
            Screen::Home => {
                println!(
                    "{} Logged in as {}",
                    style("ok").green().bold(),
                    app.home_mobile().unwrap_or_default()
                );
                let logout = Confirm::with_theme(&theme)
                    .with_prompt("Logout?")
                    .default(false)
                    .interact()?;
                if logout {
                    app.logout();
                } else {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Feed whole seconds of elapsed wall time into the countdown.
fn advance_countdown(app: &mut App, last_tick: &mut Instant) {
    let elapsed = last_tick.elapsed().as_secs();
    for _ in 0..elapsed {
        app.tick();
    }
    if elapsed > 0 {
        *last_tick = Instant::now();
    }
}

fn show_alert(app: &mut App) {
    let Some((kind, title, message)) = app
        .current_alert()
        .map(|a| (a.kind, a.title.clone(), a.message.clone()))
    else {
        return;
    };

    let tag = match kind {
        AlertKind::Success => style(title).green().bold(),
        AlertKind::Error => style(title).red().bold(),
    };
    println!("{tag}: {message}");
    app.dismiss_alert();
}
