use altre_rope::config::EngineConfig;
use altre_rope::file::expand_path;
use altre_rope::logging::Logger;
use altre_rope::search::{self, Algorithm, StringMatcher};
use altre_rope::TextBuffer;
use anyhow::{anyhow, bail, Context, Result};
use log::LevelFilter;
use std::path::PathBuf;

const USAGE: &str = "\
usage: altre-rope [--verbose] [--debug-log <path>] <command> ...

commands:
  find <file> <pattern> [--algo kmp|bm|rk|regex]
  replace <file> <pattern> <replacement> [--regex] [--first] [--output <path>]
  stats <file> <pattern>...
  context <file> <pattern> [--width N]
  config";

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (options, rest) = parse_global_options(&args);

    let mut logger = Logger::new(if options.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    });
    if let Some(path) = options.debug_log {
        logger = logger.with_file_output(path).with_level(LevelFilter::Debug);
    }
    logger.install().map_err(|err| anyhow!("failed to install logger: {}", err))?;

    let config = EngineConfig::load_or_default().context("failed to load configuration")?;

    let Some((command, command_args)) = rest.split_first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    match command.as_str() {
        "find" => run_find(&config, command_args),
        "replace" => run_replace(&config, command_args),
        "stats" => run_stats(&config, command_args),
        "context" => run_context(&config, command_args),
        "config" => {
            println!("{}", config.to_json());
            Ok(())
        }
        "-h" | "--help" | "help" => {
            println!("{}", USAGE);
            Ok(())
        }
        other => bail!("unknown command: {}\n\n{}", other, USAGE),
    }
}

struct GlobalOptions {
    verbose: bool,
    debug_log: Option<PathBuf>,
}

fn parse_global_options(args: &[String]) -> (GlobalOptions, Vec<String>) {
    let mut options = GlobalOptions {
        verbose: false,
        debug_log: None,
    };
    let mut rest = Vec::new();

    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--verbose" | "-v" if rest.is_empty() => options.verbose = true,
            "--debug-log" if rest.is_empty() => {
                let path = match iter.peek() {
                    Some(next) if !next.starts_with('-') => {
                        let path = expand_path(next);
                        iter.next();
                        path
                    }
                    _ => PathBuf::from("debug.log"),
                };
                options.debug_log = Some(path);
            }
            _ => rest.push(arg.clone()),
        }
    }

    (options, rest)
}

/// 位置引数とフラグを分ける。値を取るフラグは `valued` に列挙する
fn split_flags<'a>(
    args: &'a [String],
    valued: &[&str],
) -> Result<(Vec<&'a str>, Vec<(&'a str, Option<&'a str>)>)> {
    let mut positional = Vec::new();
    let mut flags = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(flag) = arg.strip_prefix("--") {
            if valued.contains(&flag) {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--{} requires a value", flag))?;
                flags.push((flag, Some(value.as_str())));
            } else {
                flags.push((flag, None));
            }
        } else {
            positional.push(arg.as_str());
        }
    }

    Ok((positional, flags))
}

fn flag_value<'a>(flags: &[(&str, Option<&'a str>)], name: &str) -> Option<&'a str> {
    flags
        .iter()
        .rev()
        .find(|(flag, _)| *flag == name)
        .and_then(|(_, value)| *value)
}

fn has_flag(flags: &[(&str, Option<&str>)], name: &str) -> bool {
    flags.iter().any(|(flag, _)| *flag == name)
}

fn load_buffer(config: &EngineConfig, path: &str) -> Result<TextBuffer> {
    let path = expand_path(path);
    let mut buffer = TextBuffer::with_config(config);
    buffer
        .load_from_file(&path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    Ok(buffer)
}

fn run_find(config: &EngineConfig, args: &[String]) -> Result<()> {
    let (positional, flags) = split_flags(args, &["algo"])?;
    let [file, pattern] = positional[..] else {
        bail!("usage: find <file> <pattern> [--algo kmp|bm|rk|regex]");
    };

    let buffer = load_buffer(config, file)?;
    let algo = flag_value(&flags, "algo").unwrap_or("kmp");

    let positions = if algo.eq_ignore_ascii_case("regex") {
        buffer.find_all_regex_with(pattern, config.pattern_error_policy)?
    } else {
        let algorithm: Algorithm = algo.parse().map_err(|err: String| anyhow!(err))?;
        algorithm.matcher().find_all(&buffer.to_string(), pattern)
    };

    for position in &positions {
        println!(
            "{}:{}:{}",
            position,
            buffer.line_number(*position),
            buffer.column_number(*position)
        );
    }
    log::info!("{} matches for {:?} ({})", positions.len(), pattern, algo);
    Ok(())
}

fn run_replace(config: &EngineConfig, args: &[String]) -> Result<()> {
    let (positional, flags) = split_flags(args, &["output"])?;
    let [file, pattern, replacement] = positional[..] else {
        bail!("usage: replace <file> <pattern> <replacement> [--regex] [--first] [--output <path>]");
    };

    let buffer = load_buffer(config, file)?;
    let text = buffer.to_string();
    let replaced = if has_flag(&flags, "regex") {
        search::compile(pattern, true)?;
        search::replace_regex(&text, pattern, replacement)
    } else if has_flag(&flags, "first") {
        search::replace_first(&text, pattern, replacement)
    } else {
        search::replace_all(&text, pattern, replacement)
    };

    match flag_value(&flags, "output") {
        Some(output) => {
            let output = expand_path(output);
            TextBuffer::from_text(&replaced)
                .save_to_file(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
        }
        None => print!("{}", replaced),
    }
    Ok(())
}

fn run_stats(config: &EngineConfig, args: &[String]) -> Result<()> {
    let Some((file, patterns)) = args.split_first() else {
        bail!("usage: stats <file> <pattern>...");
    };
    if patterns.is_empty() {
        bail!("usage: stats <file> <pattern>...");
    }

    let buffer = load_buffer(config, file)?;
    let patterns: Vec<&str> = patterns.iter().map(String::as_str).collect();
    let stats = search::search_stats(&buffer.to_string(), &patterns);
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn run_context(config: &EngineConfig, args: &[String]) -> Result<()> {
    let (positional, flags) = split_flags(args, &["width"])?;
    let [file, pattern] = positional[..] else {
        bail!("usage: context <file> <pattern> [--width N]");
    };

    let width = match flag_value(&flags, "width") {
        Some(value) => value
            .parse::<usize>()
            .with_context(|| format!("invalid width: {}", value))?,
        None => config.context_length,
    };

    let buffer = load_buffer(config, file)?;
    for found in search::search_with_context(&buffer.to_string(), pattern, width) {
        println!("{}: {}", found.position, found.context.replace('\n', " "));
    }
    Ok(())
}
