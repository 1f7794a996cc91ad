//! Periodic push of paid listings to the portal syndication partner.
//!
//! Spawns a background task that picks up listings in `wird_veroeffentlicht`
//! (paid, awaiting publication), creates or updates the partner-side
//! property, opens a portal listing with the purchased runtime and
//! activates the configured targets. Runs on a fixed interval using
//! `tokio::time::interval`.
//!
//! Each listing is processed independently. A failure leaves the row in
//! `wird_veroeffentlicht`, so it is retried on the next tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use immopilot_db::models::listing::Listing;
use immopilot_db::repositories::{ListingRepo, ProfileRepo};
use immopilot_db::DbPool;
use immopilot_mail::{templates, Mailer};
use immopilot_syndication::{PropertyInput, PublishInput, SyndicationClient};

/// How often the sync job polls for paid listings.
const SYNC_INTERVAL: Duration = Duration::from_secs(60);

/// Maximum listings pushed per tick.
const SYNC_BATCH_SIZE: i64 = 20;

/// Run the syndication sync loop until `cancel` is triggered.
pub async fn run(
    pool: DbPool,
    client: Arc<SyndicationClient>,
    mailer: Option<Arc<Mailer>>,
    cancel: tokio_util::sync::CancellationToken,
) {
    tracing::info!(
        interval_secs = SYNC_INTERVAL.as_secs(),
        batch_size = SYNC_BATCH_SIZE,
        targets = ?client.target_codes(),
        "Syndication sync job started"
    );

    // Credential check up front so a bad key shows up in the logs at boot,
    // not on the first paid listing.
    match client.get_account().await {
        Ok(account) => {
            tracing::info!(account_id = %account.id, name = %account.name, active = account.active, "Syndication account verified");
        }
        Err(e) => {
            tracing::error!(error = %e, "Syndication account check failed; pushes will be retried anyway");
        }
    }

    let mut interval = tokio::time::interval(SYNC_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Syndication sync job stopping");
                break;
            }
            _ = interval.tick() => {
                if let Err(e) = sync_batch(&pool, &client, mailer.as_deref()).await {
                    tracing::error!(error = %e, "Syndication sync: batch failed");
                }
            }
        }
    }
}

/// Push one batch of pending listings. Errors on individual listings are
/// logged and do not abort the batch.
async fn sync_batch(
    pool: &DbPool,
    client: &SyndicationClient,
    mailer: Option<&Mailer>,
) -> Result<(), sqlx::Error> {
    let pending = ListingRepo::list_pending_sync(pool, SYNC_BATCH_SIZE).await?;
    if pending.is_empty() {
        tracing::debug!("Syndication sync: nothing to push");
        return Ok(());
    }

    tracing::info!(count = pending.len(), "Syndication sync: pushing listings");

    for listing in pending {
        let id = listing.id;
        if let Err(e) = publish_listing(pool, client, mailer, &listing).await {
            tracing::error!(listing_id = id, error = %e, "Syndication sync: push failed, will retry");
        }
    }

    Ok(())
}

/// Publish a single listing: ensure the partner property exists, open the
/// portal listing, activate targets, then record the activation locally.
async fn publish_listing(
    pool: &DbPool,
    client: &SyndicationClient,
    mailer: Option<&Mailer>,
    listing: &Listing,
) -> Result<(), anyhow::Error> {
    let input = property_input(listing);

    // Re-syncs (e.g. a retry after a partial failure) reuse the stored
    // property id instead of creating a duplicate.
    let property_id = match &listing.syndication_property_id {
        Some(existing) => {
            client.update_property(existing, &input).await?;
            existing.clone()
        }
        None => client.create_property(&input).await?.id,
    };

    let portal_listing = client
        .create_listing(
            &property_id,
            &PublishInput {
                runtime_days: listing.runtime_days,
            },
        )
        .await?;

    client
        .activate_targets(&portal_listing.id, client.target_codes())
        .await?;

    let published_at = Utc::now();
    let expires_at = published_at + chrono::Duration::days(i64::from(listing.runtime_days));

    ListingRepo::mark_active(
        pool,
        listing.id,
        &property_id,
        &portal_listing.id,
        published_at,
        expires_at,
    )
    .await?;

    tracing::info!(
        listing_id = listing.id,
        property_id = %property_id,
        portal_listing_id = %portal_listing.id,
        %expires_at,
        "Syndication sync: listing activated"
    );

    if let Some(mailer) = mailer {
        notify_owner(pool, mailer, listing, &expires_at.format("%d.%m.%Y").to_string()).await;
    }

    Ok(())
}

/// Best-effort "your listing is live" email. Failures are logged only.
async fn notify_owner(pool: &DbPool, mailer: &Mailer, listing: &Listing, expires_at: &str) {
    let email = match ProfileRepo::find_by_user(pool, listing.owner_id).await {
        Ok(Some(profile)) => profile.email,
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(listing_id = listing.id, error = %e, "Publish mail: profile lookup failed");
            return;
        }
    };

    let Some(email) = email else {
        tracing::debug!(listing_id = listing.id, "Publish mail: owner has no email on file");
        return;
    };

    let mail = templates::listing_published(&listing.title, expires_at);
    if let Err(e) = mailer.send(&email, &mail.subject, &mail.body).await {
        tracing::warn!(listing_id = listing.id, error = %e, "Publish mail: send failed");
    }
}

fn property_input(listing: &Listing) -> PropertyInput {
    PropertyInput {
        external_ref: listing.id.to_string(),
        transaction_type: listing.transaction_type.clone(),
        usage_type: listing.usage_type.clone(),
        title: listing.title.clone(),
        description: listing.description.clone(),
        street: listing.street.clone(),
        house_number: listing.house_number.clone(),
        postal_code: listing.postal_code.clone(),
        city: listing.city.clone(),
        country: listing.country.clone(),
        hide_address: listing.hide_address,
        living_area_sqm: listing.living_area_sqm,
        plot_area_sqm: listing.plot_area_sqm,
        rooms: listing.rooms,
        construction_year: listing.construction_year,
        price_cents: listing.price_cents,
        currency: listing.currency.clone(),
    }
}
