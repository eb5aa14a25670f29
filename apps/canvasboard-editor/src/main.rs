use canvasboard_editor_lib::shell::{self, ShellCommand};
use canvasboard_editor_lib::{Editor, EditorConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = EditorConfig::from_env();
    let mut editor = match Editor::from_config(&config) {
        Ok(editor) => editor,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("failed to read stdin: {}", e);
                break;
            }
        };
        let output = match shell::parse(&line) {
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => shell::execute(&mut editor, command).await,
            Ok(None) => continue,
            Err(e) => format!("error: {}", e),
        };
        if stdout.write_all(format!("{}\n", output).as_bytes()).await.is_err() {
            break;
        }
        let _ = stdout.flush().await;
    }
}
