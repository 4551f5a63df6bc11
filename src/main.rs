//! jsx-indent CLI - re-indent or highlight OCaml with JSX markup

use std::error::Error;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use jsx_indent::{Config, KeepIndentation, LexicalMap};

const USAGE: &str = "usage: jsx-indent [--config FILE] [--html] [FILE|-]";

struct Args {
    config: Option<String>,
    html: bool,
    input: Option<String>,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut args = Args {
        config: None,
        html: false,
        input: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                args.config = Some(iter.next().ok_or("--config needs a file")?);
            }
            "--html" => args.html = true,
            "-h" | "--help" => return Err(USAGE.into()),
            "-" => args.input = None,
            flag if flag.starts_with("--") => {
                return Err(format!("unknown option {flag}\n{USAGE}").into());
            }
            path => args.input = Some(path.to_owned()),
        }
    }
    Ok(args)
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    // Read from a file, or stdin for `-` and no argument.
    let input = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let output = if args.html {
        let map = LexicalMap::new(&input);
        jsx_indent::to_html(&input, &map)
    } else {
        let fallback = KeepIndentation {
            tab_width: config.tab_width,
        };
        jsx_indent::reindent(&input, config.scan_options(), &fallback)
    };
    io::stdout().write_all(output.as_bytes())?;
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("jsx-indent: {err}");
            ExitCode::FAILURE
        }
    }
}
