use super::CogDescriptor;
use crate::discord::commands::{admin, help, info, prefix, presence};
use crate::discord::{BoxFuture, Data, Error};
use poise::serenity_prelude as serenity;

pub const NAME: &str = "Meta";

pub const COG: CogDescriptor = CogDescriptor {
    name: NAME,
    description: "About the bot",
    hidden: false,
    commands,
    on_ready,
};

fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        help::help(),
        prefix::prefix(),
        info::whois(),
        info::stats(),
        info::ping(),
        info::support(),
        info::upvote(),
        admin::logout(),
    ]
}

fn on_ready<'a>(ctx: &'a serenity::Context, data: &'a Data) -> BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move {
        presence::register_presence_job(
            &data.scheduler,
            ctx.clone(),
            data.config.presence.clone(),
            data.config.version.clone(),
        )
        .await?;

        data.readiness.mark_ready(NAME)?;
        Ok(())
    })
}
