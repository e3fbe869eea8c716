use std::time::Duration;

use reaper_common::log;
use serenity::all::{
    ButtonStyle, ChannelId, ComponentInteraction, Context, CreateActionRow, CreateButton,
    CreateEmbed, CreateInteractionResponse, CreateInteractionResponseMessage, CreateMessage,
    EditChannel, EditMember, GetMessages, GuildId, Message, MessageId, Permissions, Timestamp,
    User, UserId,
};

use super::pending_bans::{BanDecision, CANCEL_BAN_ID, CONFIRM_BAN_ID, PendingBan, PendingBans};
use super::rules::{
    MAX_TIMEOUT, ModAction, parse_clear_amount, parse_duration, parse_slowmode, parse_user_id,
    purge_candidates, reason_from,
};

const PURGE_NOTICE_LIFETIME: Duration = Duration::from_secs(5);

fn action_embed(colour: u32, title: &str, description: String, moderator: UserId) -> CreateEmbed {
    CreateEmbed::new()
        .colour(colour)
        .title(title)
        .description(description)
        .field("Moderator", format!("<@{}>", moderator), true)
        .timestamp(Timestamp::now())
}

/// Runs moderation commands for members holding the matching permission.
#[derive(Clone)]
pub struct ModerationService {
    log_channel: Option<ChannelId>,
    pending_bans: PendingBans,
}

impl ModerationService {
    pub fn new(log_channel: Option<ChannelId>) -> Self {
        Self {
            log_channel,
            pending_bans: PendingBans::new(),
        }
    }

    pub async fn run(
        &self,
        ctx: &Context,
        msg: &Message,
        action: ModAction,
        args: &[String],
    ) -> serenity::Result<()> {
        let Some(guild) = msg.guild_id else {
            return Ok(());
        };
        let granted = author_permissions(ctx, msg, guild).await.unwrap_or_else(Permissions::empty);
        if !action.is_allowed(granted) {
            msg.reply(&ctx.http, action.denied_reply()).await?;
            return Ok(());
        }

        match action {
            ModAction::Kick => self.kick(ctx, msg, guild, args).await,
            ModAction::Ban => self.request_ban(ctx, msg, guild, args).await,
            ModAction::Unban => self.unban(ctx, msg, guild, args).await,
            ModAction::Timeout => self.timeout(ctx, msg, guild, args).await,
            ModAction::Clear => self.clear(ctx, msg, args).await,
            ModAction::Slowmode => self.slowmode(ctx, msg, args).await,
        }
    }

    async fn kick(&self, ctx: &Context, msg: &Message, guild: GuildId, args: &[String]) -> serenity::Result<()> {
        let Some(target) = self.mentioned_target(ctx, msg, "kick").await? else {
            return Ok(());
        };
        let reason = reason_from(args, 1);
        if let Err(e) = guild.kick_with_reason(&ctx.http, target.id, &reason).await {
            log!("Kick of {} failed: {}", target.id, e);
            msg.reply(&ctx.http, "I cannot kick this user. They may have a higher role than me.")
                .await?;
            return Ok(());
        }

        let embed = action_embed(
            0xFFA500,
            "👢 User Kicked",
            format!("**{}** has been kicked.", target.tag()),
            msg.author.id,
        )
        .field("Reason", reason, true);
        self.announce(ctx, msg.channel_id, embed).await
    }

    async fn request_ban(
        &self,
        ctx: &Context,
        msg: &Message,
        guild: GuildId,
        args: &[String],
    ) -> serenity::Result<()> {
        let Some(target) = self.mentioned_target(ctx, msg, "ban").await? else {
            return Ok(());
        };
        let reason = reason_from(args, 1);

        let confirmation = CreateEmbed::new()
            .colour(0xFF4500)
            .title("Ban Confirmation")
            .description(format!(
                "Are you sure you want to ban **{}** for the reason: *{}*?",
                target.tag(),
                reason
            ));
        let buttons = CreateActionRow::Buttons(vec![
            CreateButton::new(CONFIRM_BAN_ID).label("Confirm").style(ButtonStyle::Danger),
            CreateButton::new(CANCEL_BAN_ID).label("Cancel").style(ButtonStyle::Secondary),
        ]);
        let sent = msg
            .channel_id
            .send_message(&ctx.http, CreateMessage::new().embed(confirmation).components(vec![buttons]))
            .await?;

        let pending = PendingBan {
            guild,
            moderator: msg.author.id,
            target: target.id,
            target_tag: target.tag(),
            reason,
        };
        self.pending_bans.open(sent.id, pending).await;
        self.pending_bans.expire_after(ctx.http.clone(), msg.channel_id, sent.id);
        Ok(())
    }

    /// Confirm or cancel from the moderator who asked; other clicks are acknowledged silently.
    pub async fn handle_ban_decision(
        &self,
        ctx: &Context,
        component: &ComponentInteraction,
        decision: BanDecision,
    ) -> serenity::Result<()> {
        let Some(pending) = self.pending_bans.claim(component.message.id, component.user.id).await else {
            return component
                .create_response(&ctx.http, CreateInteractionResponse::Acknowledge)
                .await;
        };

        let update = match decision {
            BanDecision::Cancel => CreateInteractionResponseMessage::new()
                .content("Ban cancelled.")
                .embeds(Vec::new())
                .components(Vec::new()),
            BanDecision::Confirm => {
                match pending
                    .guild
                    .ban_with_reason(&ctx.http, pending.target, 0, &pending.reason)
                    .await
                {
                    Ok(()) => {
                        let embed = action_embed(
                            0xFF0000,
                            "🔨 User Banned",
                            format!("**{}** has been banned.", pending.target_tag),
                            pending.moderator,
                        )
                        .field("Reason", pending.reason.clone(), true);
                        self.send_log(ctx, embed.clone()).await;
                        CreateInteractionResponseMessage::new()
                            .embed(embed)
                            .components(Vec::new())
                    }
                    Err(e) => {
                        log!("Ban of {} failed: {}", pending.target, e);
                        CreateInteractionResponseMessage::new()
                            .content("I cannot ban this user. They may have a higher role than me.")
                            .embeds(Vec::new())
                            .components(Vec::new())
                    }
                }
            }
        };
        component
            .create_response(&ctx.http, CreateInteractionResponse::UpdateMessage(update))
            .await
    }

    async fn unban(&self, ctx: &Context, msg: &Message, guild: GuildId, args: &[String]) -> serenity::Result<()> {
        let Some(raw) = args.first() else {
            msg.reply(&ctx.http, "Please provide the User ID of the person to unban.")
                .await?;
            return Ok(());
        };
        let Some(user_id) = parse_user_id(Some(raw)) else {
            msg.reply(&ctx.http, "Please provide a valid User ID.").await?;
            return Ok(());
        };

        if let Err(e) = guild.unban(&ctx.http, UserId::new(user_id)).await {
            log!("Unban of {} failed: {}", user_id, e);
            msg.reply(&ctx.http, "This user is not banned.").await?;
            return Ok(());
        }

        let embed = action_embed(
            0x00FF00,
            "✅ User Unbanned",
            format!("User with ID **{}** has been unbanned.", user_id),
            msg.author.id,
        );
        self.announce(ctx, msg.channel_id, embed).await
    }

    async fn timeout(&self, ctx: &Context, msg: &Message, guild: GuildId, args: &[String]) -> serenity::Result<()> {
        let Some(target) = msg.mentions.first() else {
            msg.reply(&ctx.http, "Please mention a user to timeout.").await?;
            return Ok(());
        };
        let Some(raw_duration) = args.get(1) else {
            msg.reply(&ctx.http, "Please provide a duration (e.g., `10m`, `1h`, `1d`).")
                .await?;
            return Ok(());
        };
        let Some(duration) = parse_duration(raw_duration) else {
            msg.reply(&ctx.http, "Invalid duration format. Use `s`, `m`, `h`, or `d`.")
                .await?;
            return Ok(());
        };
        if duration > MAX_TIMEOUT {
            msg.reply(&ctx.http, "Timeout duration cannot exceed 28 days.").await?;
            return Ok(());
        }
        let reason = reason_from(args, 2);

        let until_secs = Timestamp::now().unix_timestamp() + duration.as_secs() as i64;
        let Ok(until) = Timestamp::from_unix_timestamp(until_secs) else {
            msg.reply(&ctx.http, "Invalid duration format. Use `s`, `m`, `h`, or `d`.")
                .await?;
            return Ok(());
        };
        let edit = EditMember::new()
            .disable_communication_until_datetime(until)
            .audit_log_reason(&reason);
        if let Err(e) = guild.edit_member(&ctx.http, target.id, edit).await {
            log!("Timeout of {} failed: {}", target.id, e);
            msg.reply(&ctx.http, "I cannot time out this user. They may have a higher role than me.")
                .await?;
            return Ok(());
        }

        let embed = action_embed(
            0xFFFF00,
            "🤫 User Timed Out",
            format!("**{}** has been put in timeout.", target.tag()),
            msg.author.id,
        )
        .field("Duration", raw_duration.clone(), true)
        .field("Reason", reason, false);
        self.announce(ctx, msg.channel_id, embed).await
    }

    async fn clear(&self, ctx: &Context, msg: &Message, args: &[String]) -> serenity::Result<()> {
        let Some(amount) = parse_clear_amount(args.first().map(String::as_str)) else {
            msg.reply(&ctx.http, "Please provide a number of messages to delete (1-100).")
                .await?;
            return Ok(());
        };
        let target = msg.mentions.first();

        let fetched = msg
            .channel_id
            .messages(&ctx.http, GetMessages::new().limit(amount))
            .await?;
        let pairs: Vec<(u64, u64)> = fetched.iter().map(|m| (m.id.get(), m.author.id.get())).collect();
        let now_ms = u64::try_from(Timestamp::now().unix_timestamp()).unwrap_or_default() * 1000;
        let ids: Vec<MessageId> = purge_candidates(&pairs, target.map(|user| user.id.get()), now_ms)
            .into_iter()
            .map(MessageId::new)
            .collect();

        match ids.as_slice() {
            [] => {}
            [single] => msg.channel_id.delete_message(&ctx.http, *single).await?,
            many => msg.channel_id.delete_messages(&ctx.http, many).await?,
        }

        let embed = action_embed(
            0x36393F,
            "🧹 Messages Purged",
            format!("Successfully deleted **{}** messages.", ids.len()),
            msg.author.id,
        );
        let notice = msg
            .channel_id
            .send_message(&ctx.http, CreateMessage::new().embed(embed.clone()))
            .await?;
        let http = ctx.http.clone();
        let channel = msg.channel_id;
        tokio::spawn(async move {
            tokio::time::sleep(PURGE_NOTICE_LIFETIME).await;
            if let Err(e) = channel.delete_message(&http, notice.id).await {
                log!("Failed to remove purge notice: {}", e);
            }
        });

        let target_label = target.map_or_else(|| "All".to_string(), User::tag);
        let logged = embed
            .field("Channel", format!("<#{}>", msg.channel_id), false)
            .field("Target User", target_label, false);
        self.send_log(ctx, logged).await;
        Ok(())
    }

    async fn slowmode(&self, ctx: &Context, msg: &Message, args: &[String]) -> serenity::Result<()> {
        let Some(secs) = parse_slowmode(args.first().map(String::as_str)) else {
            msg.reply(&ctx.http, "Please provide a valid number of seconds for the slowmode.")
                .await?;
            return Ok(());
        };
        msg.channel_id
            .edit(&ctx.http, EditChannel::new().rate_limit_per_user(secs))
            .await?;

        let embed = action_embed(
            0x4E5D94,
            "⏳ Slowmode Updated",
            format!("This channel's slowmode has been set to **{} seconds**.", secs),
            msg.author.id,
        );
        msg.channel_id
            .send_message(&ctx.http, CreateMessage::new().embed(embed))
            .await?;
        Ok(())
    }

    /// The first mentioned user, unless missing or the author themselves.
    async fn mentioned_target<'a>(
        &self,
        ctx: &Context,
        msg: &'a Message,
        verb: &str,
    ) -> serenity::Result<Option<&'a User>> {
        let Some(target) = msg.mentions.first() else {
            msg.reply(&ctx.http, format!("Please mention the user to {}.", verb))
                .await?;
            return Ok(None);
        };
        if target.id == msg.author.id {
            msg.reply(&ctx.http, format!("You cannot {} yourself.", verb)).await?;
            return Ok(None);
        }
        Ok(Some(target))
    }

    async fn announce(&self, ctx: &Context, channel: ChannelId, embed: CreateEmbed) -> serenity::Result<()> {
        channel
            .send_message(&ctx.http, CreateMessage::new().embed(embed.clone()))
            .await?;
        self.send_log(ctx, embed).await;
        Ok(())
    }

    async fn send_log(&self, ctx: &Context, embed: CreateEmbed) {
        let Some(channel) = self.log_channel else {
            return;
        };
        if let Err(e) = channel.send_message(&ctx.http, CreateMessage::new().embed(embed)).await {
            log!("Log channel {} unavailable: {}", channel, e);
        }
    }
}

/// Permissions of the message author in the message's channel, from the cache.
async fn author_permissions(ctx: &Context, msg: &Message, guild: GuildId) -> Option<Permissions> {
    let member = guild.member(&ctx.http, msg.author.id).await.ok()?;
    let guild = ctx.cache.guild(guild)?;
    let channel = guild.channels.get(&msg.channel_id)?;
    Some(guild.user_permissions_in(channel, &member))
}
