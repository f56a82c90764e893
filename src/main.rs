use clap::Parser;
use costo_match_common::{normalize_with, tokenize, EntityMatcher};
use costo_reconcile::{cli, config, crm, error, export, invoice, reconcile};
use cli::{Cli, Commands};
use config::Config;
use error::{ReconcileError, Result};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_today(value: Option<&str>) -> Result<chrono::NaiveDate> {
    match value {
        Some(v) => invoice::parse_date(v).ok_or_else(|| {
            ReconcileError::Config(format!("日付を解釈できません: {}", v))
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // 設定ファイルを書き込むコマンドは指定パスがまだなくてよい
    let updating = matches!(
        &cli.command,
        Commands::Config { init, set_threshold, .. } if *init || set_threshold.is_some()
    );
    let mut config = if updating {
        Config::load_for_update(cli.config.as_deref())?
    } else {
        Config::load(cli.config.as_deref())?
    };

    match cli.command {
        Commands::Reconcile { invoices, crm: crm_path, output, format, threshold, today } => {
            println!("🧾 costo-reconcile - 請求書照合\n");

            if let Some(t) = threshold {
                config.set_threshold(t)?;
            }
            let today = parse_today(today.as_deref())?;

            // 1. 請求書読み込み
            println!("[1/4] 請求書を読み込み中...");
            let invoices = invoice::load_invoices(&invoices)?;
            println!("✔ {}件の請求書を検出\n", invoices.len());

            // 2. CRM読み込み
            println!("[2/4] CRM名簿を読み込み中...");
            let crm_data = crm::Crm::load(&crm_path, &config.crm_columns)?;
            if crm_data.is_empty() {
                return Err(ReconcileError::EmptyRoster(crm_path.display().to_string()));
            }
            println!("✔ {}名（重複除外後）\n", crm_data.roster().len());

            // 3. 照合
            println!("[3/4] 顧客名を照合中... (閾値: {})", config.matcher.threshold);
            let roster = EntityMatcher::new(config.matcher.clone()).prepare(crm_data.roster());
            let options = reconcile::ReconcileOptions {
                today,
                windows: config.activity,
                show_progress: !cli.verbose,
            };
            let lines = reconcile::reconcile(&invoices, &crm_data, &roster, &options);
            let summary = reconcile::Summary::from_lines(&lines);
            println!("✔ 照合完了\n");

            // 4. 出力
            println!("[4/4] レポートを出力中... ({})", format);
            for path in export::export_report(&lines, &summary, &format, &output)? {
                println!("✔ 出力: {}", path.display());
            }

            println!("\n集計:");
            println!("  売上合計: €{:.2}", summary.total_revenue);
            println!(
                "  CRM一致率: {:.0}% ({}/{})",
                summary.match_rate, summary.matched_lines, summary.lines
            );
            println!("  累計支払額（一致顧客）: €{:.2}", summary.ltv_impact);
            for (status, count) in &summary.by_status {
                println!("  {}: {}", status, count);
            }

            println!("\n✅ 完了");
        }

        Commands::Match { name, crm: crm_path, top, threshold } => {
            if let Some(t) = threshold {
                config.set_threshold(t)?;
            }

            let crm_data = crm::Crm::load(&crm_path, &config.crm_columns)?;
            let matcher = EntityMatcher::new(config.matcher.clone());

            println!("正規化: {}", normalize_with(&name, matcher.config()));
            match matcher.best_match(&name, crm_data.roster()) {
                Some(m) => println!("✔ 一致: {} (スコア {:.3})", m.name, m.score),
                None => println!("✘ 一致なし (閾値 {})", matcher.config().threshold),
            }

            let ranked = matcher.rank(&name, crm_data.roster(), top);
            if !ranked.is_empty() {
                println!("\n候補:");
                for (i, candidate) in ranked.iter().enumerate() {
                    println!("  {}. {} ({:.3})", i + 1, candidate.name, candidate.score);
                }
            }
        }

        Commands::Normalize { names } => {
            for name in names {
                let normalized = normalize_with(&name, &config.matcher);
                let tokens: Vec<String> =
                    tokenize(&normalized, &config.matcher).into_iter().collect();
                println!("{} → {} [{}]", name, normalized, tokens.join(", "));
            }
        }

        Commands::Config { show, init, set_threshold } => {
            if init {
                let path = Config::default().save(cli.config.as_deref())?;
                config = Config::default();
                println!("✔ 設定ファイルを作成しました: {}", path.display());
            }

            if let Some(t) = set_threshold {
                config.set_threshold(t)?;
                let path = config.save(cli.config.as_deref())?;
                println!("✔ 閾値を {} に設定しました: {}", t, path.display());
            }

            if show || (!init && set_threshold.is_none()) {
                println!("設定:");
                println!("  閾値: {}", config.matcher.threshold);
                println!("  部分一致の重み: {}", config.matcher.substring_weight);
                println!("  短トークン長: {}文字以下は無視", config.matcher.short_token_max_len);
                println!("  ノイズ語: {:?}", config.matcher.noise_patterns);
                let columns = &config.crm_columns;
                println!(
                    "  CRM列: {} / {} / {}",
                    columns.name, columns.lifetime_value, columns.last_active
                );
                println!(
                    "  Active: {}日未満 / At Risk: {}日未満",
                    config.activity.active_days, config.activity.at_risk_days
                );
            }
        }
    }

    Ok(())
}
