// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
#![allow(dead_code)] // backend exposes a broad API surface to the frontend; not all items are referenced in Rust yet

mod api;
mod app_state;
mod chain;
mod chain_client;
mod config_store;
mod contracts;
mod deployment;
mod errors;
mod listing;
mod metadata;
mod mint;
mod provider;
mod sale;
mod session;
mod storage;
mod validation;

use crate::api::types::{
    ConnectWalletResponse, ConnectionStatusResponse, DisconnectWalletResponse,
    EnsureChainResponse, FormatPriceRequest, FormatPriceResponse, MarketInfoResponse,
    MintTokenResponse, PrepareSaleRequest, TokenDetailsResponse, TokenPageRequest,
    UpdateNetworkRequest, ValidateAddressRequest, ValidateAddressResponse,
};
use crate::app_state::{MarketContext, SharedMarketContext};
use crate::chain::{Address, Amount};
use crate::chain_client::ChainClient;
use crate::config_store::MarketConfig;
use crate::contracts::{get_market_contract, get_nft_contract, MarketContract, NftContract};
use crate::deployment::{get_deployment_config, init_deployment_config_from_env};
use crate::errors::MarketError;
use crate::listing::ListingPage;
use crate::metadata::MetadataClient;
use crate::mint::MintRequest;
use crate::provider::WalletProvider;
use crate::sale::SaleDraft;
use crate::storage::{RecordEntry, RecordStore};
use crate::validation::InputValidator;
use tauri::Manager;
use tauri::State;

fn to_frontend_error(err: MarketError) -> String {
    err.to_string()
}

fn resolve_gateway_endpoints(
    state: &State<'_, SharedMarketContext>,
    override_url: Option<String>,
) -> Result<Vec<String>, String> {
    if let Some(url) = override_url {
        let trimmed = url.trim().to_string();
        return if trimmed.is_empty() {
            Err("Override gateway endpoint cannot be empty".to_string())
        } else {
            Ok(vec![trimmed])
        };
    }

    let mut endpoints = state
        .read(|ctx| {
            let config = ctx.load_config()?;
            let mut resolved = Vec::with_capacity(1 + config.network.failover_endpoints.len());
            resolved.push(config.network.primary_endpoint);
            resolved.extend(config.network.failover_endpoints);
            Ok::<Vec<String>, MarketError>(resolved)
        })
        .map_err(to_frontend_error)?;

    endpoints.retain(|url| !url.trim().is_empty());
    if endpoints.is_empty() {
        return Err("No gateway endpoints configured".to_string());
    }

    for endpoint in &mut endpoints {
        *endpoint = endpoint.trim().to_string();
    }

    Ok(endpoints)
}

/// Bind the NFT and market handles to one gateway endpoint for the
/// connected account.
fn bind_market_suite(
    endpoint: &str,
    account: &str,
) -> Result<(NftContract, MarketContract), MarketError> {
    let deployment = get_deployment_config()?;
    let contracts = deployment.contract_addresses()?;
    let nft = get_nft_contract(endpoint, contracts.nft, account)?;
    let market = get_market_contract(endpoint, contracts.market, account)?;
    Ok((nft, market))
}

#[tauri::command]
async fn connect_wallet(
    state: State<'_, SharedMarketContext>,
) -> Result<ConnectWalletResponse, String> {
    let config = state.read(|ctx| ctx.load_config()).map_err(to_frontend_error)?;
    let provider =
        WalletProvider::new(config.network.wallet_endpoint).map_err(to_frontend_error)?;

    let accounts = provider.request_accounts().await.map_err(to_frontend_error)?;
    let account = accounts
        .first()
        .cloned()
        .ok_or_else(|| "Wallet exposed no accounts".to_string())?;

    let deployment = get_deployment_config().map_err(to_frontend_error)?;
    let profile = deployment.chain_profile().map_err(to_frontend_error)?;

    let mut chain_id = provider.chain_id().await.map_err(to_frontend_error)?;
    if !chain_id.eq_ignore_ascii_case(&profile.chain_id) {
        provider.ensure_chain(&profile).await.map_err(to_frontend_error)?;
        chain_id = provider.chain_id().await.map_err(to_frontend_error)?;
    }

    state
        .read(|ctx| {
            ctx.connection().connect(account.clone(), chain_id.clone());
            Ok(())
        })
        .map_err(to_frontend_error)?;

    Ok(ConnectWalletResponse { account, chain_id })
}

#[tauri::command]
fn disconnect_wallet(
    state: State<'_, SharedMarketContext>,
) -> Result<DisconnectWalletResponse, String> {
    state
        .read(|ctx| {
            ctx.connection().disconnect();
            Ok(DisconnectWalletResponse { disconnected: true })
        })
        .map_err(to_frontend_error)
}

#[tauri::command]
fn get_connection_status(
    state: State<'_, SharedMarketContext>,
) -> Result<ConnectionStatusResponse, String> {
    state
        .read(|ctx| {
            let info = ctx.connection().info();
            Ok(ConnectionStatusResponse {
                connected: info.is_some(),
                account: info.as_ref().map(|i| i.account.clone()),
                chain_id: info.as_ref().map(|i| i.chain_id.clone()),
                connected_for_secs: ctx.connection().connected_for_secs(),
                listing_phase: ctx.listing_phase(),
            })
        })
        .map_err(to_frontend_error)
}

#[tauri::command]
async fn ensure_market_chain(
    state: State<'_, SharedMarketContext>,
) -> Result<EnsureChainResponse, String> {
    let config = state.read(|ctx| ctx.load_config()).map_err(to_frontend_error)?;
    let provider =
        WalletProvider::new(config.network.wallet_endpoint).map_err(to_frontend_error)?;

    let deployment = get_deployment_config().map_err(to_frontend_error)?;
    let profile = deployment.chain_profile().map_err(to_frontend_error)?;

    provider.ensure_chain(&profile).await.map_err(to_frontend_error)?;

    state
        .read(|ctx| {
            if ctx.connection().is_connected() {
                ctx.connection().set_chain(profile.chain_id.clone())?;
            }
            Ok(())
        })
        .map_err(to_frontend_error)?;

    Ok(EnsureChainResponse {
        chain_id: profile.chain_id,
    })
}

#[tauri::command]
fn validate_address(
    _state: State<'_, SharedMarketContext>,
    request: ValidateAddressRequest,
) -> Result<ValidateAddressResponse, String> {
    let validator = InputValidator::default();
    if validator.validate_address(&request.address).is_err() {
        return Ok(ValidateAddressResponse { is_valid: false });
    }

    let valid = Address::from_string(&request.address).is_ok();
    Ok(ValidateAddressResponse { is_valid: valid })
}

#[tauri::command]
fn format_price(
    _state: State<'_, SharedMarketContext>,
    request: FormatPriceRequest,
) -> Result<FormatPriceResponse, String> {
    let validator = InputValidator::default();
    validator
        .validate_price(&request.price)
        .map_err(|e| e.to_string())?;

    let amount = Amount::from_string(&request.price).map_err(|e| e.to_string())?;

    Ok(FormatPriceResponse {
        formatted: amount.to_display_string(request.decimals.unwrap_or(5) as u8),
    })
}

#[tauri::command]
async fn mint_token(
    state: State<'_, SharedMarketContext>,
    request: MintRequest,
) -> Result<MintTokenResponse, String> {
    let account = state
        .read(|ctx| ctx.connection().account())
        .map_err(to_frontend_error)?;

    let validator = InputValidator::default();
    let metadata_client = MetadataClient::default();

    let validated = match mint::validate(&request, &validator, &metadata_client).await {
        Ok(validated) => validated,
        Err(issue) => return Ok(MintTokenResponse::rejected(issue)),
    };

    let config = state.read(|ctx| ctx.load_config()).map_err(to_frontend_error)?;
    let deployment = get_deployment_config().map_err(to_frontend_error)?;
    let wait_blocks = deployment.tx_wait_block_count().map_err(to_frontend_error)?;

    // Mints are submitted against the primary endpoint only; replaying a
    // state-changing call on a failover could double-submit.
    let endpoints = resolve_gateway_endpoints(&state, None)?;
    let endpoint = endpoints
        .first()
        .ok_or_else(|| "No gateway endpoints configured".to_string())?;

    let (_, market) = bind_market_suite(endpoint, &account).map_err(to_frontend_error)?;
    let chain = ChainClient::new(endpoint.clone()).map_err(to_frontend_error)?;
    let records = RecordStore::new(config.records.endpoint).map_err(to_frontend_error)?;

    let outcome = mint::execute(&validated, &account, &market, &chain, &records, wait_blocks)
        .await
        .map_err(to_frontend_error)?;

    Ok(MintTokenResponse::minted(outcome))
}

#[tauri::command]
async fn get_tokens_for_sale(
    state: State<'_, SharedMarketContext>,
    request: TokenPageRequest,
) -> Result<ListingPage, String> {
    let account = state
        .read(|ctx| ctx.connection().account())
        .map_err(to_frontend_error)?;
    let rows_per_page = resolve_rows_per_page(&state, request.rows_per_page)?;
    let endpoints = resolve_gateway_endpoints(&state, request.gateway_url.clone())?;
    let metadata_client = MetadataClient::default();

    state.write(|ctx| {
        ctx.listing_started();
        Ok(())
    })
    .map_err(to_frontend_error)?;

    let mut last_error: Option<String> = None;
    for endpoint in endpoints {
        let (nft, market) = match bind_market_suite(&endpoint, &account) {
            Ok(handles) => handles,
            Err(err) => {
                last_error = Some(to_frontend_error(err));
                continue;
            }
        };

        match listing::fetch_sale_page(&market, &nft, &metadata_client, request.page, rows_per_page)
            .await
        {
            Ok(page) => {
                state.write(|ctx| {
                    ctx.listing_finished();
                    Ok(())
                })
                .map_err(to_frontend_error)?;
                return Ok(page);
            }
            Err(err) => {
                last_error = Some(to_frontend_error(err));
            }
        }
    }

    state.write(|ctx| {
        ctx.listing_failed();
        Ok(())
    })
    .map_err(to_frontend_error)?;

    Err(last_error
        .unwrap_or_else(|| "Failed to fetch sale listings from all gateway endpoints".to_string()))
}

#[tauri::command]
async fn get_owned_tokens(
    state: State<'_, SharedMarketContext>,
    request: TokenPageRequest,
) -> Result<ListingPage, String> {
    let account = state
        .read(|ctx| ctx.connection().account())
        .map_err(to_frontend_error)?;
    let rows_per_page = resolve_rows_per_page(&state, request.rows_per_page)?;
    let endpoints = resolve_gateway_endpoints(&state, request.gateway_url.clone())?;

    state.write(|ctx| {
        ctx.listing_started();
        Ok(())
    })
    .map_err(to_frontend_error)?;

    let mut last_error: Option<String> = None;
    for endpoint in endpoints {
        let (nft, market) = match bind_market_suite(&endpoint, &account) {
            Ok(handles) => handles,
            Err(err) => {
                last_error = Some(to_frontend_error(err));
                continue;
            }
        };

        match listing::fetch_owned_page(&market, &nft, &account, request.page, rows_per_page).await
        {
            Ok(page) => {
                state.write(|ctx| {
                    ctx.listing_finished();
                    Ok(())
                })
                .map_err(to_frontend_error)?;
                return Ok(page);
            }
            Err(err) => {
                last_error = Some(to_frontend_error(err));
            }
        }
    }

    state.write(|ctx| {
        ctx.listing_failed();
        Ok(())
    })
    .map_err(to_frontend_error)?;

    Err(last_error
        .unwrap_or_else(|| "Failed to fetch owned tokens from all gateway endpoints".to_string()))
}

#[tauri::command]
async fn get_token_details(
    state: State<'_, SharedMarketContext>,
    token_id: u64,
) -> Result<TokenDetailsResponse, String> {
    let account = state
        .read(|ctx| ctx.connection().account())
        .map_err(to_frontend_error)?;
    let endpoints = resolve_gateway_endpoints(&state, None)?;
    let metadata_client = MetadataClient::default();

    let mut last_error: Option<String> = None;
    for endpoint in endpoints {
        let (nft, market) = match bind_market_suite(&endpoint, &account) {
            Ok(handles) => handles,
            Err(err) => {
                last_error = Some(to_frontend_error(err));
                continue;
            }
        };

        let result = async {
            let info = market.token_info(token_id).await?;
            let uri = nft.token_uri(token_id).await?;
            let metadata = metadata_client.fetch(&uri).await?;
            let display_price = info.price_amount()?.to_display_string(5);
            Ok::<TokenDetailsResponse, MarketError>(TokenDetailsResponse {
                info,
                display_price,
                metadata,
            })
        }
        .await;

        match result {
            Ok(details) => return Ok(details),
            Err(err) => {
                last_error = Some(to_frontend_error(err));
            }
        }
    }

    Err(last_error
        .unwrap_or_else(|| "Failed to fetch token details from all gateway endpoints".to_string()))
}

#[tauri::command]
async fn prepare_sale(
    state: State<'_, SharedMarketContext>,
    request: PrepareSaleRequest,
) -> Result<SaleDraft, String> {
    let account = state
        .read(|ctx| ctx.connection().account())
        .map_err(to_frontend_error)?;
    let endpoints = resolve_gateway_endpoints(&state, None)?;
    let endpoint = endpoints
        .first()
        .ok_or_else(|| "No gateway endpoints configured".to_string())?;

    let deployment = get_deployment_config().map_err(to_frontend_error)?;
    let contracts = deployment.contract_addresses().map_err(to_frontend_error)?;

    let (nft, market) = bind_market_suite(endpoint, &account).map_err(to_frontend_error)?;
    let metadata_client = MetadataClient::default();
    let validator = InputValidator::default();

    sale::prepare_draft(
        request.token_id,
        request.kind,
        request.asking_price,
        &market,
        &nft,
        &metadata_client,
        &contracts,
        &validator,
    )
    .await
    .map_err(to_frontend_error)
}

#[tauri::command]
async fn get_minted_records(
    state: State<'_, SharedMarketContext>,
) -> Result<RecordEntry, String> {
    let account = state
        .read(|ctx| ctx.connection().account())
        .map_err(to_frontend_error)?;
    let config = state.read(|ctx| ctx.load_config()).map_err(to_frontend_error)?;

    let records = RecordStore::new(config.records.endpoint).map_err(to_frontend_error)?;
    records
        .fetch_records(&account)
        .await
        .map_err(to_frontend_error)
}

#[tauri::command]
fn get_market_info(
    state: State<'_, SharedMarketContext>,
) -> Result<MarketInfoResponse, String> {
    let deployment = get_deployment_config().map_err(to_frontend_error)?;
    let profile = deployment.chain_profile().map_err(to_frontend_error)?;
    let contracts = deployment.contract_addresses().map_err(to_frontend_error)?;

    state
        .read(|ctx| {
            Ok(MarketInfoResponse {
                environment: ctx.environment().to_string(),
                chain: profile.clone(),
                contracts: (&contracts).into(),
                config: ctx.load_config()?,
                connected: ctx.connection().is_connected(),
            })
        })
        .map_err(to_frontend_error)
}

#[tauri::command]
fn update_network_settings(
    state: State<'_, SharedMarketContext>,
    request: UpdateNetworkRequest,
) -> Result<MarketConfig, String> {
    state
        .write(|ctx| {
            ctx.update_config(|config| {
                if let Some(primary) = request.primary_endpoint.clone() {
                    config.network.primary_endpoint = primary;
                }
                if let Some(failovers) = request.failover_endpoints.clone() {
                    config.network.failover_endpoints = failovers;
                }
                if let Some(wallet) = request.wallet_endpoint.clone() {
                    config.network.wallet_endpoint = wallet;
                }
                if let Some(records) = request.records_endpoint.clone() {
                    config.records.endpoint = records;
                }
                Ok(())
            })
        })
        .map_err(to_frontend_error)
}

fn resolve_rows_per_page(
    state: &State<'_, SharedMarketContext>,
    requested: Option<u64>,
) -> Result<u64, String> {
    if let Some(rows) = requested {
        if rows == 0 {
            return Err("Rows per page must be positive".to_string());
        }
        return Ok(rows);
    }

    state
        .read(|ctx| Ok(ctx.load_config()?.listing.default_rows_per_page))
        .map_err(to_frontend_error)
}

fn main() {
    init_deployment_config_from_env().expect("Failed to initialize deployment configuration");

    tauri::Builder::default()
        .plugin(tauri_plugin_shell::init())
        .setup(move |app| {
            let config_dir = app
                .path()
                .app_config_dir()
                .map_err(|e| MarketError::Unknown(e.to_string()))?;
            let context = MarketContext::initialize(config_dir)?;
            app.manage(SharedMarketContext::new(context));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            connect_wallet,
            disconnect_wallet,
            get_connection_status,
            ensure_market_chain,
            validate_address,
            format_price,
            mint_token,
            get_tokens_for_sale,
            get_owned_tokens,
            get_token_details,
            prepare_sale,
            get_minted_records,
            get_market_info,
            update_network_settings
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
