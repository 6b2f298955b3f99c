use anyhow::Result;
use mcq_quiz::utils::logging;
use mcq_quiz::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置，命令行第一个参数作为题目文件
    let config = Config::load()?.with_input_file(std::env::args().nth(1));

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let _report = App::initialize(config).await?.run().await?;

    Ok(())
}
