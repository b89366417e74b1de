use screen_locator::{LocatorError, MatchMethod, Point, ScaleRange};
use std::path::PathBuf;

#[derive(Debug)]
pub struct Args {
    pub capture: PathBuf,
    pub template: String,
    pub origin: Point,
    pub threshold: Option<f32>,
    pub scale_range: Option<ScaleRange>,
    pub method: Option<MatchMethod>,
    pub retries: u32,
    pub click: bool,
    pub json: bool,
    pub debug_mode: bool,
}

#[derive(Debug)]
pub enum ParseOutcome {
    Run(Args),
    Help,
    Version,
}

impl Args {
    /// Parse flags, skipping the program name
    pub fn parse_from(args: &[String]) -> Result<ParseOutcome, String> {
        let mut capture: Option<PathBuf> = None;
        let mut template: Option<String> = None;
        let mut origin = Point::default();
        let mut threshold: Option<f32> = None;
        let mut scale_range: Option<ScaleRange> = None;
        let mut method: Option<MatchMethod> = None;
        let mut retries: u32 = 1;
        let mut click = false;
        let mut json = false;
        let mut debug_mode = false;

        for arg in args.iter().skip(1) {
            if arg == "--help" || arg == "-h" {
                return Ok(ParseOutcome::Help);
            } else if arg == "--version" || arg == "-v" {
                return Ok(ParseOutcome::Version);
            } else if arg == "--click" {
                click = true;
            } else if arg == "--json" {
                json = true;
            } else if arg == "--debug" {
                debug_mode = true;
            } else if let Some(val) = arg.strip_prefix("--capture=") {
                capture = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--template=") {
                template = Some(val.to_string());
            } else if let Some(val) = arg.strip_prefix("--threshold=") {
                threshold = Some(
                    val.parse::<f32>()
                        .map_err(|_| format!("Invalid threshold value: {val}"))?,
                );
            } else if let Some(val) = arg.strip_prefix("--scale=") {
                let (min, max) = parse_pair::<f64>(val)
                    .ok_or_else(|| format!("Invalid scale range: {val} (expected MIN,MAX)"))?;
                scale_range = Some(ScaleRange::new(min, max).map_err(|e| e.to_string())?);
            } else if let Some(val) = arg.strip_prefix("--origin=") {
                let (x, y) = parse_pair::<i32>(val)
                    .ok_or_else(|| format!("Invalid origin: {val} (expected X,Y)"))?;
                origin = Point::new(x, y);
            } else if let Some(val) = arg.strip_prefix("--retries=") {
                retries = val
                    .parse::<u32>()
                    .map_err(|_| format!("Invalid retries value: {val}"))?;
            } else if let Some(val) = arg.strip_prefix("--method=") {
                let parsed: MatchMethod = val.parse().map_err(|e: LocatorError| e.to_string())?;
                method = Some(parsed);
            } else {
                return Err(format!("Unknown argument: {arg}"));
            }
        }

        let capture = capture.ok_or("Missing --capture=<image>")?;
        let template = template.ok_or("Missing --template=<image>")?;

        Ok(ParseOutcome::Run(Args {
            capture,
            template,
            origin,
            threshold,
            scale_range,
            method,
            retries,
            click,
            json,
            debug_mode,
        }))
    }
}

fn parse_pair<T: std::str::FromStr>(raw: &str) -> Option<(T, T)> {
    let (a, b) = raw.split_once(',')?;
    Some((a.trim().parse().ok()?, b.trim().parse().ok()?))
}

pub fn print_help() {
    println!("🔍 Screen Element Locator");
    println!();
    println!("USAGE:");
    println!("    screen-locator --capture=<image> --template=<image> [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --capture=PATH      Image file standing in for the screen capture");
    println!("    --template=PATH     Template image to locate (read as grayscale)");
    println!("    --origin=X,Y        Screen position of the capture's top-left (default 0,0)");
    println!("    --threshold=F       Minimum match score; omit to accept the best match");
    println!("    --scale=MIN,MAX     Scale factors to try when the threshold is missed");
    println!("    --method=NAME       ccoeff (default) or ccorr");
    println!("    --retries=N         Capture+match attempts (default 1)");
    println!("    --click             Dry-run a click at the element centre");
    println!("    --json              Print the result as JSON");
    println!("    --debug             Enable debug logging");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("ENVIRONMENT:");
    println!("    SCREEN_LOCATOR_THRESHOLD, SCREEN_LOCATOR_BACKOFF_MS, SCREEN_LOCATOR_METHOD, ...");
    println!("    RUST_LOG            Log filter (default: info)");
    println!();
    println!("EXAMPLES:");
    println!("    screen-locator --capture=shot.png --template=button.png");
    println!("    screen-locator --capture=shot.png --template=icon.png \\");
    println!("        --threshold=0.8 --scale=0.5,1.5");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(flags: &[&str]) -> Vec<String> {
        std::iter::once("screen-locator")
            .chain(flags.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_full_command() {
        let outcome = Args::parse_from(&argv(&[
            "--capture=shot.png",
            "--template=btn.png",
            "--origin=10,-20",
            "--threshold=0.8",
            "--scale=0.5,1.5",
            "--retries=3",
            "--json",
        ]))
        .unwrap();

        let ParseOutcome::Run(args) = outcome else {
            panic!("expected run");
        };
        assert_eq!(args.capture, PathBuf::from("shot.png"));
        assert_eq!(args.template, "btn.png");
        assert_eq!(args.origin, Point::new(10, -20));
        assert_eq!(args.threshold, Some(0.8));
        assert_eq!(args.scale_range, Some(ScaleRange { min: 0.5, max: 1.5 }));
        assert_eq!(args.retries, 3);
        assert!(args.json);
        assert!(!args.click);
    }

    #[test]
    fn test_missing_required_flags() {
        assert!(Args::parse_from(&argv(&["--template=a.png"])).is_err());
        assert!(Args::parse_from(&argv(&["--capture=a.png"])).is_err());
    }

    #[test]
    fn test_bad_values() {
        assert!(Args::parse_from(&argv(&["--capture=a", "--template=b", "--scale=2,1"])).is_err());
        assert!(Args::parse_from(&argv(&["--capture=a", "--template=b", "--origin=1"])).is_err());
        assert!(Args::parse_from(&argv(&["--bogus"])).is_err());
    }

    #[test]
    fn test_help_and_version() {
        assert!(matches!(
            Args::parse_from(&argv(&["--help"])),
            Ok(ParseOutcome::Help)
        ));
        assert!(matches!(
            Args::parse_from(&argv(&["-v"])),
            Ok(ParseOutcome::Version)
        ));
    }
}
