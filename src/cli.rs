//! Drives the command-line program.

use crate::ai::client::APIClient;
use crate::ai::client::claude::ClaudeClient;
use crate::clock::SystemClock;
use crate::conf::{self, Settings};
use crate::count::{SortAlgorithm, TopicCounter};
use crate::generator::PostGenerator;
use crate::news::{HttpFeedService, NewsCollector};
use crate::persona::Stage;
use crate::scoring::{self, Rubric};
use crate::threads::ThreadsClient;
use crate::view::{ViewOptions, Viewable, score_badge};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use itertools::Itertools;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

/// Prints an error message and exits with the given code.
pub fn die(error_code: i32, message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(error_code);
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Your personal Threads ghostwriter", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity,

    #[command(subcommand)]
    command: Command,
}

impl Config {
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Draft, score, and rank candidate posts
    #[clap(alias = "d")]
    Draft {
        /// Only draft from news mentioning these keywords
        keywords: Vec<String>,

        /// Draft as this persona (default: the first configured one)
        #[arg(long)]
        persona: Option<String>,

        /// Read drafting context from FILE instead of the feeds
        /// ('-' reads standard input)
        #[arg(long, value_name = "FILE")]
        context: Option<PathBuf>,

        /// Generate this many candidates
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,

        /// Prefer the calm register (suits know-how and numbers content)
        #[arg(long, default_value_t = false)]
        calm: bool,

        /// Skip the humanize pass and keep the raw drafts
        #[arg(long, default_value_t = false)]
        single_pass: bool,

        /// Show the per-metric score breakdown for each candidate
        #[arg(long, default_value_t = false)]
        details: bool,
    },

    /// List the latest news items from the configured feeds
    News {
        /// Only show news mentioning these keywords
        keywords: Vec<String>,

        /// Show at most 'n' items
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,

        /// Output one line per item
        #[arg(long, default_value_t = false)]
        oneline: bool,
    },

    /// Tally which configured topics today's news mentions
    #[clap(alias = "t")]
    Trends(TrendsConfig),

    /// Score existing post text against the rubric
    Score {
        /// Read the post text from FILE ('-' or omitted reads standard input)
        file: Option<PathBuf>,

        /// The post's topic tag (default: the first #word in the text)
        #[arg(long)]
        tag: Option<String>,

        /// The distribution stage you expect the post to reach (1-4)
        #[arg(long)]
        stage: Option<String>,
    },

    /// List the configured personas
    Personas,

    /// Manage Threads API authorization
    Auth(AuthConfig),

    /// Publish a post to Threads
    Publish {
        /// The post text; omit to read standard input
        text: Option<String>,
    },

    /// Show engagement metrics for a published post
    Insights {
        /// The post id printed at publish time
        post_id: String,
    },
}

#[derive(Args, Debug)]
struct TrendsConfig {
    /// Sort output by mention count instead of alphabetically by topic
    #[arg(short = 'c', long = "count", default_value_t = false)]
    sort_by_count: bool,

    /// Sweep at most 'n' news items
    #[arg(short = 'n', long, default_value_t = 50)]
    limit: usize,
}

impl TrendsConfig {
    fn sort_algorithm(&self) -> SortAlgorithm {
        if self.sort_by_count {
            SortAlgorithm::Numerically
        } else {
            SortAlgorithm::Lexicographically
        }
    }
}

#[derive(Args, Debug)]
struct AuthConfig {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Debug, Subcommand)]
enum AuthSubcommand {
    /// Print the URL to visit to authorize the app
    Url,

    /// Exchange an authorization code for a long-lived token
    Token {
        /// The 'code' parameter from the redirect URL
        code: String,
    },
}

/// Runs the command-line program.
#[derive(Debug)]
pub struct Runner {
    config: Config,
    settings: Settings,
}

impl Runner {
    /// Create a new program runner using the given `config`.
    ///
    /// Returns an error if the settings file exists but cannot be parsed.
    pub fn new(config: Config) -> Result<Runner, conf::Error> {
        let settings = Settings::load()?;
        Ok(Self { config, settings })
    }

    /// Run the command-line program using its stored configuration options.
    pub async fn run(&self) {
        match &self.config.command {
            Command::Draft {
                keywords,
                persona,
                context,
                count,
                calm,
                single_pass,
                details,
            } => {
                self.run_draft(keywords, persona, context, *count, *calm, *single_pass, *details)
                    .await
            }
            Command::News {
                keywords,
                limit,
                oneline,
            } => self.run_news(keywords, *limit, *oneline).await,
            Command::Trends(config) => self.run_trends(config).await,
            Command::Score { file, tag, stage } => self.run_score(file, tag, stage),
            Command::Personas => self.run_personas(),
            Command::Auth(config) => self.run_auth(&config.command).await,
            Command::Publish { text } => self.run_publish(text).await,
            Command::Insights { post_id } => self.run_insights(post_id).await,
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_draft(
        &self,
        keywords: &[String],
        persona: &Option<String>,
        context: &Option<PathBuf>,
        count: usize,
        calm: bool,
        single_pass: bool,
        details: bool,
    ) {
        let persona = self
            .settings
            .persona_named(persona.as_deref())
            .unwrap_or_else(|| {
                die(
                    1,
                    &format!(
                        "no persona named '{}'; try `threadsmith personas`",
                        persona.as_deref().unwrap_or_default()
                    ),
                )
            });

        let context = match context {
            Some(path) => read_text_file(path),
            None => {
                let collector = NewsCollector::new(self.settings.feeds.clone());
                let items = collector
                    .collect(&HttpFeedService::default(), 5, keywords)
                    .await;
                match items.first() {
                    Some(item) => item.prompt_block(),
                    None => die(
                        1,
                        "no news matched; check your feeds, loosen the keywords, or pass --context",
                    ),
                }
            }
        };

        let auth = conf::anthropic_auth().unwrap_or_else(|err| die(2, &err.to_string()));
        let generator = PostGenerator::new(ClaudeClient::new(auth))
            .weights(self.settings.weights.clone())
            .calm_priority(calm)
            .two_pass(!single_pass);

        match generator.generate(&persona, &context, count).await {
            Ok(posts) => {
                let opts = ViewOptions::build().details(details).build();
                let output = posts.iter().map(|post| post.view(&opts)).join("\n\n\n");
                println!("{}", output);
            }
            Err(err) => die(1, &format!("could not generate posts: {err}")),
        }
    }

    async fn run_news(&self, keywords: &[String], limit: usize, oneline: bool) {
        let collector = NewsCollector::new(self.settings.feeds.clone());
        let items = collector
            .collect(&HttpFeedService::default(), limit, keywords)
            .await;

        if items.is_empty() {
            println!("No news items matched.");
            return;
        }

        let opts = ViewOptions::build().oneline(oneline).build();
        let joiner = if oneline { "\n" } else { "\n\n" };
        let output = items.iter().map(|item| item.view(&opts)).join(joiner);
        println!("{}", output);
    }

    async fn run_trends(&self, config: &TrendsConfig) {
        let collector = NewsCollector::new(self.settings.feeds.clone());
        let items = collector
            .collect(&HttpFeedService::default(), config.limit, &[])
            .await;

        let tallies = TopicCounter::from_items(&self.settings.topics, items.iter())
            .sort_by(&config.sort_algorithm())
            .collect::<Vec<_>>();
        println!("{}", tallies.view(&ViewOptions::default()));
    }

    fn run_score(&self, file: &Option<PathBuf>, tag: &Option<String>, stage: &Option<String>) {
        let text = match file {
            Some(path) => read_text_file(path),
            None => read_stdin(),
        };
        if text.trim().is_empty() {
            die(1, "nothing to score: the post text is empty");
        }

        let tag = tag.clone().or_else(|| detect_tag(&text));
        let stage = stage
            .as_deref()
            .map(Stage::parse_lenient)
            .unwrap_or_default();
        let cta = text
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or_default();

        let rubric = Rubric;
        let details = rubric.evaluate(&text, cta, tag.as_deref(), stage);
        let composite = match scoring::composite(&details, &self.settings.weights) {
            Ok(composite) => composite,
            Err(err) => die(1, &format!("could not score post: {err}")),
        };
        let human_likeness = rubric.human_likeness(&text, cta);

        println!("{} {:.1} / 100\n", score_badge(composite), composite);
        for (metric, score) in details.iter() {
            let weight = self.settings.weights.get(metric).unwrap_or(0.0);
            println!("  {:<22} {:>5.1}  (weight {:.2})", metric.to_string(), score, weight);
        }
        println!("  {:<22} {:>5.1}  (advisory)", "human likeness", human_likeness);
    }

    fn run_personas(&self) {
        let output = self
            .settings
            .personas()
            .iter()
            .map(|persona| persona.view(&ViewOptions::default()))
            .join("\n\n");
        println!("{}", output);
    }

    async fn run_auth(&self, command: &AuthSubcommand) {
        let (app_id, app_secret) =
            conf::threads_app().unwrap_or_else(|err| die(2, &err.to_string()));
        match command {
            AuthSubcommand::Url => {
                let client = ThreadsClient::new(app_id, app_secret);
                println!("Visit this URL to authorize the app:\n");
                println!("{}", client.authorization_url());
                println!("\nThen run `threadsmith auth token <code>` with the 'code'");
                println!("parameter from the URL you are redirected to.");
            }
            AuthSubcommand::Token { code } => {
                let mut client = ThreadsClient::new(app_id, app_secret);
                if let Err(err) = client.exchange_code(code).await {
                    die(1, &format!("could not exchange the code: {err}"));
                }
                // Both values are set by a successful exchange.
                let token = client.access_token().unwrap_or_default();
                let user_id = client.user_id().unwrap_or_default();
                println!("Authorized. Add these to your shell environment:\n");
                println!("  export {}='{}'", conf::ACCESS_TOKEN_VAR, token);
                println!("  export {}='{}'", conf::USER_ID_VAR, user_id);
            }
        }
    }

    async fn run_publish(&self, text: &Option<String>) {
        let text = match text {
            Some(text) => text.clone(),
            None => read_stdin(),
        };
        if text.trim().is_empty() {
            die(1, "nothing to publish: the post text is empty");
        }

        let client = self.user_client();
        match client.publish(&text, &SystemClock::default()).await {
            Ok(receipt) => println!("{}", receipt.view(&ViewOptions::default())),
            Err(err) => die(1, &format!("could not publish: {err}")),
        }
    }

    async fn run_insights(&self, post_id: &str) {
        let client = self.user_client();
        match client.insights(post_id).await {
            Ok(insights) => println!("{}", insights.view(&ViewOptions::default())),
            Err(err) => die(1, &format!("could not fetch insights: {err}")),
        }
    }

    /// A Threads client bound to the token from the environment.
    ///
    /// Publishing and insights only need the user token, so the app
    /// credentials are optional here.
    fn user_client(&self) -> ThreadsClient<crate::threads::service::HttpThreadsService> {
        let (access_token, user_id) =
            conf::threads_user().unwrap_or_else(|err| die(2, &err.to_string()));
        let (app_id, app_secret) = conf::threads_app().unwrap_or_default();
        ThreadsClient::new(app_id, app_secret).authenticated(access_token, user_id)
    }
}

/// Finds the first `#word` in the text, if any.
fn detect_tag(text: &str) -> Option<String> {
    text.split_whitespace()
        .find(|word| word.starts_with('#') && word.len() > 1)
        .map(String::from)
}

fn read_text_file(path: &Path) -> String {
    if path == Path::new("-") {
        return read_stdin();
    }
    fs::read_to_string(path)
        .unwrap_or_else(|err| die(1, &format!("could not read {}: {err}", path.display())))
}

fn read_stdin() -> String {
    let mut buffer = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut buffer) {
        die(1, &format!("could not read standard input: {err}"));
    }
    buffer
}

/// Runs the command-line program.
pub async fn run(config: Config) {
    env_logger::Builder::new()
        .filter_level(config.verbosity().log_level_filter())
        .init();

    match Runner::new(config) {
        Ok(runner) => runner.run().await,
        Err(err) => die(2, &err.to_string()),
    }
}
