use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use indicatif::ProgressBar;

use omnivault_common::{normalize_detections, ChatMessage, ChatRole};
use omnivault_rust::{
    assistant, cli, config, detector, error, preprocess, review, scanner, search, store, vault,
};

use cli::{Cli, Commands};
use config::Config;
use error::OmniVaultError;
use review::ReviewOutcome;
use store::CatalogStore;
use vault::flow::AddFlow;
use vault::Vault;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Add {
            photo,
            yes,
            location,
            use_cache,
        } => {
            println!("📸 omnivault - 写真解析\n");
            let mut vault = open_vault(&config, cli.verbose)?;
            add_photo(
                &photo,
                yes,
                location.as_deref(),
                use_cache,
                &config,
                &mut vault,
                cli.ai_provider,
                cli.verbose,
            )
            .await?;
        }

        Commands::Scan {
            folder,
            yes,
            use_cache,
        } => {
            println!("📸 omnivault - フォルダ一括解析\n");

            let photos = scanner::scan_folder(&folder)?;
            if photos.is_empty() {
                return Err(
                    OmniVaultError::NoImagesFound(folder.display().to_string()).into(),
                );
            }
            println!("✔ {}枚の写真を検出\n", photos.len());

            let mut vault = open_vault(&config, cli.verbose)?;
            for (index, photo) in photos.iter().enumerate() {
                println!("--- [{}/{}] {}", index + 1, photos.len(), photo.display());
                if let Err(e) = add_photo(
                    photo,
                    yes,
                    None,
                    use_cache,
                    &config,
                    &mut vault,
                    cli.ai_provider,
                    cli.verbose,
                )
                .await
                {
                    // 1枚の失敗で残りを止めない
                    eprintln!("✖ {}\n", e);
                }
            }

            println!("\n✅ 一括解析完了（カタログ合計 {}件）", vault.len());
        }

        Commands::List {
            query,
            category,
            sort,
        } => {
            let vault = open_vault(&config, cli.verbose)?;
            let options = search::SearchOptions {
                query,
                category,
                sort,
            };
            let matched = search::filter_items(vault.items(), &options);

            println!("📦 在庫 {}件 / 全{}件\n", matched.len(), vault.len());
            for item in &matched {
                let duplicate_mark = if item.is_duplicate {
                    " ⚠重複候補"
                } else {
                    ""
                };
                println!("- {} [{}]{}", item.name, item.category, duplicate_mark);
                println!(
                    "    ID: {} / 場所: {} / 追加日: {}",
                    item.id, item.storage_location, item.date_added
                );
                if item.price > 0.0 {
                    println!("    推定価格: ${:.2}", item.price);
                }
            }
        }

        Commands::Delete { ids } => {
            let mut vault = open_vault(&config, cli.verbose)?;
            let removed = vault.delete_many(&ids)?;

            if removed == 0 {
                println!("該当するアイテムがありません");
            } else {
                println!("✔ {}件を削除しました（残り {}件）", removed, vault.len());
            }
        }

        Commands::Chat { query } => {
            let vault = open_vault(&config, cli.verbose)?;

            match query {
                Some(q) => {
                    let answer =
                        assistant::chat(&q, vault.items(), cli.ai_provider, &config, cli.verbose)
                            .await?;
                    println!("{}", answer);
                }
                None => {
                    run_chat_repl(&vault, cli.ai_provider, &config, cli.verbose).await?;
                }
            }
        }

        Commands::Advise { photo } => {
            println!("🛒 omnivault - 購入相談\n");
            let vault = open_vault(&config, cli.verbose)?;

            let spinner = start_spinner("在庫と照らし合わせています...");
            let advice = assistant::shopping_advice(
                &photo,
                vault.items(),
                cli.ai_provider,
                &config,
                cli.verbose,
            )
            .await;
            spinner.finish_and_clear();

            println!("{}", advice?);
        }

        Commands::Config {
            set_max_dimension,
            set_jpeg_quality,
            show,
        } => {
            let mut config = config;
            let mut changed = false;

            if let Some(dimension) = set_max_dimension {
                config.max_image_dimension = dimension;
                changed = true;
            }
            if let Some(quality) = set_jpeg_quality {
                config.jpeg_quality = quality.min(100);
                changed = true;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  長辺上限: {}px", config.max_image_dimension);
                println!("  JPEG品質: {}", config.jpeg_quality);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  カタログ: {}", config.inventory_path()?.display());
            }
        }

        Commands::Cache { clear, info } => {
            let cache_dir = config.cache_dir()?;
            let cache_path = detector::DetectionCache::cache_path(&cache_dir);

            if info || !clear {
                if cache_path.exists() {
                    let cache = detector::DetectionCache::load(&cache_dir);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match detector::DetectionCache::clear(&cache_dir) {
                    Ok(true) => println!("✔ キャッシュを削除しました"),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}

fn open_vault(config: &Config, verbose: bool) -> Result<Vault> {
    let store = CatalogStore::open(config.inventory_path()?);
    if verbose {
        store.subscribe(|items| println!("  [store] カタログ更新: {}件", items.len()));
    }
    Ok(Vault::open(store))
}

fn start_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// 1枚の写真を 前処理 → 検出 → 正規化 → レビュー → 保存 まで通す
#[allow(clippy::too_many_arguments)]
async fn add_photo(
    photo: &Path,
    yes: bool,
    location: Option<&str>,
    use_cache: bool,
    config: &Config,
    vault: &mut Vault,
    provider: omnivault_rust::ai_provider::AiProvider,
    verbose: bool,
) -> Result<()> {
    if !photo.exists() {
        return Err(OmniVaultError::FileNotFound(photo.display().to_string()).into());
    }

    let mut flow = AddFlow::new();
    flow.begin_capture()?;

    // 1. 前処理
    println!("[1/3] 画像を前処理中...");
    flow.begin_preprocessing()?;
    let prepared = preprocess::prepare(photo, &config.prepare_options())?;
    if verbose {
        println!("  {}x{} ({} bytes)", prepared.width, prepared.height, prepared.jpeg.len());
    }

    // 2. AI検出
    println!(
        "[2/3] AI解析中...{}",
        if use_cache { " (キャッシュ有効)" } else { "" }
    );
    flow.begin_detecting()?;

    let spinner = start_spinner("AIが写真を解析しています...");
    let detected = if use_cache {
        detector::detect_items_with_cache(
            &prepared,
            provider,
            &config.cache_dir()?,
            config.timeout_seconds,
            verbose,
        )
        .await
    } else {
        detector::detect_items(&prepared, provider, config.timeout_seconds, verbose).await
    };
    spinner.finish_and_clear();

    let detected = match detected {
        Ok(detections) => detections,
        Err(e) => {
            flow.fail_detection();
            return Err(e.into());
        }
    };
    println!("✔ {}件の候補を検出", detected.len());

    // 3. 正規化（切り出し + 既定値埋め + カテゴリ正規化）
    let images: Vec<String> = detected
        .iter()
        .map(|detection| match &detection.box_2d {
            Some(bbox) => preprocess::crop(&prepared, bbox).data_url(),
            None => prepared.data_url(),
        })
        .collect();

    let mut batch = normalize_detections(&detected, &images, &vault::today());
    if let Some(location) = location {
        for item in &mut batch {
            item.storage_location = location.to_string();
        }
    }

    flow.enter_review(batch)?;

    // 4. レビュー → 保存
    let outcome = if yes {
        ReviewOutcome::Save(flow.begin_saving()?)
    } else {
        review::run_review(&mut flow)?
    };

    match outcome {
        ReviewOutcome::Save(batch) => {
            println!("\n[3/3] 保存中...");
            let added = vault.merge_batch(batch)?;
            flow.finish();
            println!("✔ {}件を保存しました（カタログ合計 {}件）\n", added, vault.len());
        }
        ReviewOutcome::Discard => {
            println!("\n破棄しました。カタログは変更されていません\n");
        }
    }

    Ok(())
}

/// 対話チャットモード。空行で終了
async fn run_chat_repl(
    vault: &Vault,
    provider: omnivault_rust::ai_provider::AiProvider,
    config: &Config,
    verbose: bool,
) -> Result<()> {
    println!("💬 在庫アシスタント（空行で終了）\n");

    let mut history: Vec<ChatMessage> = Vec::new();

    loop {
        let input: String = dialoguer::Input::new()
            .with_prompt("質問")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| OmniVaultError::CliExecution(e.to_string()))?;

        let query = input.trim().to_string();
        if query.is_empty() || query == "q" {
            break;
        }

        history.push(ChatMessage {
            role: ChatRole::User,
            content: query.clone(),
        });

        let spinner = start_spinner("考えています...");
        let answer = assistant::chat(&query, vault.items(), provider, config, verbose).await;
        spinner.finish_and_clear();

        match answer {
            Ok(answer) => {
                println!("\n{}\n", answer);
                history.push(ChatMessage {
                    role: ChatRole::Assistant,
                    content: answer,
                });
            }
            Err(e) => {
                // 1回の失敗で対話を打ち切らない
                eprintln!("✖ {}\n", e);
            }
        }
    }

    println!("会話を終了しました（{}件のやりとり）", history.len());
    Ok(())
}
