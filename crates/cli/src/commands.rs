use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Render a JSON statement document to SQL and parameters
    Render {
        #[arg(long, help = "Statement document path")]
        file: String,

        #[arg(long, default_value = "mybatis3", help = "Rendering strategy name")]
        strategy: String,

        #[arg(
            long,
            help = "Fail instead of dropping a where clause whose conditions all vanish"
        )]
        strict: bool,

        #[arg(long, help = "Print SQL and parameters as one JSON object")]
        json: bool,
    },
    /// List the built-in rendering strategies
    Strategies,
}
