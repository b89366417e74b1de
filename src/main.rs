mod args;

use args::{Args, ParseOutcome, print_help};
use screen_locator::providers::{ImageScreenshot, LoggingInput, UnavailableOcr};
use screen_locator::{Automation, FindKind, FindOptions, LocatorConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().collect();
    let args = match Args::parse_from(&argv) {
        Ok(ParseOutcome::Run(args)) => args,
        Ok(ParseOutcome::Help) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Ok(ParseOutcome::Version) => {
            println!(
                "Screen Locator v{} (c) {}",
                env!("LOCATOR_VERSION_DISPLAY"),
                env!("LOCATOR_BUILD_YEAR")
            );
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("❌ {e}");
            print_help();
            return ExitCode::from(2);
        }
    };

    let default_level = if args.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = match LocatorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            return ExitCode::from(2);
        }
    };
    if let Some(method) = args.method {
        config.method = method;
    }
    if config.window_title.is_empty() {
        config.window_title = args.capture.display().to_string();
    }

    let screenshots = ImageScreenshot::from_file(&args.capture, args.origin);
    let mut session = Automation::new(config, screenshots, UnavailableOcr, LoggingInput::new());

    let mut options = FindOptions::default().max_retries(args.retries);
    options.threshold = args.threshold;
    options.scale_range = args.scale_range;

    log::info!(
        "🔍 Looking for '{}' in {} (threshold {:?}, scale {:?})",
        args.template,
        args.capture.display(),
        options.threshold,
        options.scale_range
    );

    let Some(region) = session.find_element(&args.template, FindKind::Image, &options) else {
        if args.json {
            println!("{}", serde_json::json!({ "found": false }));
        } else {
            println!("❌ '{}' not found", args.template);
        }
        return ExitCode::from(1);
    };

    let center = region.center();
    if args.click {
        session.mouse_click(center.x, center.y);
    }

    if args.json {
        let report = serde_json::json!({
            "found": true,
            "region": region,
            "center": center,
        });
        println!("{report}");
    } else {
        println!(
            "✅ '{}' at ({},{})-({},{}) center ({},{})",
            args.template,
            region.top_left.x,
            region.top_left.y,
            region.bottom_right.x,
            region.bottom_right.y,
            center.x,
            center.y
        );
    }

    ExitCode::SUCCESS
}
