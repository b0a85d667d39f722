use board_client::{BoardClient, ListPosts};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(name = "board", about = "Command-line client for the board API")]
struct Cli {
    #[clap(short, long, default_value = "http://127.0.0.1:8080")]
    server: String,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    Create {
        #[clap(long)]
        title: String,
        #[clap(long)]
        content: String,
    },
    Get {
        id: i64,
    },
    Update {
        id: i64,
        #[clap(long)]
        title: String,
        #[clap(long)]
        content: String,
    },
    Delete {
        id: i64,
    },
    List {
        #[clap(long)]
        page: Option<u32>,
        #[clap(long)]
        size: Option<u32>,
        /// `property[,asc|desc]`, e.g. `title,asc`
        #[clap(long)]
        sort: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    let client = BoardClient::new(&args.server)?;

    match args.command {
        Command::Create { title, content } => {
            let post = client.create_post(&title, &content).await?;
            println!("Post created! ID: {}", post.post_id);
        }
        Command::Get { id } => {
            let post = client.read_post(id).await?;
            println!("{}", post);
        }
        Command::Update { id, title, content } => {
            let post = client.update_post(id, &title, &content).await?;
            println!("Post updated: {}", post);
        }
        Command::Delete { id } => {
            let deleted = client.delete_post(id).await?;
            println!("Post {} deleted!", deleted.post_id);
        }
        Command::List { page, size, sort } => {
            let posts = client.list_posts(&ListPosts { page, size, sort }).await?;
            println!(
                "Page {}/{} ({} posts total)",
                posts.number + 1,
                posts.total_pages.max(1),
                posts.total_elements
            );
            for post in posts.content {
                println!("- [{}] {}", post.post_id, post.title);
            }
        }
    }

    Ok(())
}
