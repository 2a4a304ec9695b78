use clap::{Arg, Command};
use log::debug;
use std::fs;
use std::process;

mod config;
mod directive;
mod generator;
mod render;

use config::Settings;
use directive::{parse_line, Directive};
use generator::Generator;

fn main() {
    // Парсим аргументы командной строки
    let matches = Command::new("nginx-autogen")
        .version("1.0.0")
        .about("Generates NGINX site and stream config fragments from a directive file")
        .arg(Arg::new("in_file")
            .required(true)
            .value_name("FILE")
            .help("The file(s) that you would like to use as input"))
        .arg(Arg::new("out")
            .short('o')
            .long("out")
            .value_name("DIR")
            .default_value("/etc/nginx/generated")
            .help("The output directory where sites/ and streams/ will go, defaults to /etc/nginx/generated"))
        .arg(Arg::new("domain")
            .short('d')
            .long("domain")
            .value_name("TLD")
            .default_value("clicksminuteper.net")
            .help("The default TLD, defaults to clicksminuteper.net"))
        .arg(Arg::new("ssl_dir")
            .short('s')
            .long("ssl_dir")
            .visible_alias("ssl")
            .value_name("TEMPLATE")
            .default_value("/etc/letsencrypt/live/{tld}")
            .help("The location of your SSL certificates, you can use {tld} to specify the default TLD or {domain} to specify the main domain"))
        .arg(Arg::new("test")
            .short('t')
            .long("test")
            .help("Parse the input file and report what would be generated, without writing anything")
            .action(clap::ArgAction::SetTrue))
        .get_matches();

    // Вся диагностика идет в stdout, как и остальной вывод инструмента
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::fmt::Target::Stdout)
        .init();

    let settings = Settings::new(
        matches.get_one::<String>("out").unwrap(),
        matches.get_one::<String>("domain").unwrap(),
        matches.get_one::<String>("ssl_dir").unwrap(),
    );

    // Входной файл читаем до любых изменений на диске
    let in_file = matches.get_one::<String>("in_file").unwrap();
    let in_data = match fs::read_to_string(in_file) {
        Ok(data) => data,
        Err(e) => {
            debug!("Failed to read {}: {}", in_file, e);
            println!("You must enter a valid input file");
            process::exit(1);
        }
    };

    if matches.get_flag("test") {
        check_directives(in_file, &in_data, &settings);
        return;
    }

    let generator = Generator::new(settings);
    if let Err(e) = generator.prepare_directories() {
        println!("Failed to create output directories: {}", e);
        process::exit(1);
    }

    println!(
        "Proxying and streaming sites, please remember that this will not delete any files, \
         only overwrite existing ones. Any files you no longer need must be deleted manually"
    );

    if let Err(e) = generator.process(&in_data) {
        println!("Failed to write generated config: {}", e);
        process::exit(1);
    }

    println!("Reconfiguration complete, please remember to restart NGINX");
}

/// Режим проверки (как nginx -t): разбирает входной файл и ничего не пишет
fn check_directives(in_file: &str, in_data: &str, settings: &Settings) {
    let mut streams = 0;
    let mut proxies = 0;
    let mut warnings = 0;

    for line in in_data.lines() {
        match parse_line(line, &settings.default_domain) {
            Ok(Some(Directive::Stream(_))) => streams += 1,
            Ok(Some(Directive::Proxy(_))) => proxies += 1,
            Ok(None) => {}
            Err(warning) => {
                println!("Warning: {}", warning);
                warnings += 1;
            }
        }
    }

    println!(
        "nginx-autogen: {} would generate {} site(s) and {} stream(s)",
        in_file, proxies, streams
    );

    if warnings > 0 {
        println!(
            "nginx-autogen: directive file {} is ok ({} warning(s), lines skipped)",
            in_file, warnings
        );
    } else {
        println!("nginx-autogen: directive file {} is ok", in_file);
    }
}
