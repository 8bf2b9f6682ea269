use bindery::epub::fetch::DEFAULT_TIMEOUT_SECS;
use bindery::{BookConfig, Format, GenerationReport, HttpFetcher, Result, TocTreeStyle};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// 📚 Bindery - EPUB电子书生成工具
#[derive(Parser)]
#[command(name = "bindery")]
#[command(about = "根据书籍描述文件生成EPUB电子书")]
#[command(version)]
struct Args {
    /// 书籍描述文件路径
    #[arg(help = "书籍描述文件（YAML）路径", required_unless_present = "init")]
    book_file: Option<PathBuf>,

    /// 输出格式，可重复指定
    #[arg(short, long = "format", help = "输出格式（epub、epub2、epub3），覆盖描述文件中的设置")]
    formats: Vec<String>,

    /// 输出目录
    #[arg(short, long, default_value = ".", help = "EPUB文件的输出目录")]
    out_dir: PathBuf,

    /// 详细输出模式
    #[arg(short, long, help = "显示详细信息")]
    verbose: bool,

    /// 图片获取超时
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, help = "获取图片的超时时间（秒）")]
    timeout: u64,

    /// 生成示例描述文件
    #[arg(long, value_name = "PATH", help = "在指定路径生成示例书籍描述文件")]
    init: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "bindery=debug" } else { "bindery=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    println!("📚 Bindery - EPUB生成工具");

    if let Some(path) = &args.init {
        match BookConfig::generate_template(path) {
            Ok(()) => println!("📝 已生成示例描述文件: {}", path.display()),
            Err(e) => {
                eprintln!("❌ 错误: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let Some(book_file) = &args.book_file else {
        return;
    };

    if args.verbose {
        println!("🔍 详细模式已启用");
    }
    println!("正在读取书籍描述: {}", book_file.display());

    match build(book_file, &args) {
        Ok(reports) => {
            for report in &reports {
                display_report(report, args.verbose);
            }
            println!("🎉 EPUB生成完成！");
        }
        Err(e) => {
            eprintln!("❌ 错误: {}", e);
            std::process::exit(1);
        }
    }
}

fn build(book_file: &Path, args: &Args) -> Result<Vec<GenerationReport>> {
    let mut book = BookConfig::load(book_file)?;

    if !args.formats.is_empty() {
        book.clear_formats();
        for format in &args.formats {
            book.add_format(format.parse::<Format>()?);
        }
    }

    let fetcher = HttpFetcher::with_timeout(args.timeout)?;
    bindery::generate_with(&book, &fetcher, &args.out_dir)
}

/// 显示一个压缩包的生成结果
fn display_report(report: &GenerationReport, verbose: bool) {
    println!("\n📦 {} ({})", report.output.display(), report.format);
    println!("  📚 内容划分: {} 个", report.divisions);
    println!("  📁 清单项目: {} 个", report.manifest_items);

    if !report.images.is_empty() {
        println!("  🖼️  图片: {} 张", report.images.len());
        if verbose {
            for (i, image) in report.images.iter().enumerate() {
                println!("    {}. {}", i + 1, image);
            }
        }
    }

    if !report.failed_images.is_empty() {
        println!("  ⚠️  获取失败的图片: {} 张", report.failed_images.len());
        for (i, src) in report.failed_images.iter().enumerate() {
            println!("    {}. {}", i + 1, src);
        }
    }

    // 详细模式显示文件路径，简洁模式限制深度
    let toc_tree = if verbose {
        report.toc_tree().with_show_paths(true)
    } else {
        report
            .toc_tree()
            .with_style(TocTreeStyle::Indented)
            .with_show_paths(false)
            .with_max_depth(Some(3))
    };
    println!("\n  🌳 目录树:");
    println!("{}", toc_tree);
}
