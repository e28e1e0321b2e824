use anyhow::Result;
use oj_submit::utils::logging;
use oj_submit::{App, Command, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 解析命令
    let arg = std::env::args().nth(1);
    let command = Command::parse(arg.as_deref())?;
    logging::log_startup(command.as_str(), &config.grading_host);

    // 初始化并运行应用
    let app = App::initialize(config).await?;
    app.run(command).await?;

    Ok(())
}
