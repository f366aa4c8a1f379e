use clamm_math::{get_amounts_for_liquidity, price_at_tick};
use clamm_types::PoolParams;
use clamm_vault::{ClammVault, ClammVaultClient};
use soroban_sdk::testutils::Address as _;
use soroban_sdk::token::{StellarAssetClient, TokenClient};
use soroban_sdk::{Address, Env};

use crate::{invariants, ClammPool, ClammPoolClient};

/// √price of ≈1922 token0 per token1, between ticks -75616 and -75615
pub const FIXTURE_PRICE: u128 = 1807174424252647735792883644;

/// Liquidity backed by exactly 10^18 token1 over [-80068, -69081] at FIXTURE_PRICE
pub const FIXTURE_LIQUIDITY: u128 = 219653609758424781044;

/// A pool wired to a real vault and two Stellar asset contracts
pub struct Setup<'a> {
    pub env: &'a Env,
    pub pool: ClammPoolClient<'a>,
    pub vault: ClammVaultClient<'a>,
    pub token0: Address,
    pub token1: Address,
    pub factory: Address,
    pub fee_recipient: Address,
    /// Owner of every position minted through `mint_position`
    pub lp: Address,
}

impl<'a> Setup<'a> {
    pub fn new(env: &'a Env, sqrt_price_x96: u128, swap_fee: u32, protocol_fee_bps: u32) -> Self {
        env.mock_all_auths();

        let admin = Address::generate(env);
        let token_a = env.register_stellar_asset_contract_v2(admin.clone()).address();
        let token_b = env.register_stellar_asset_contract_v2(admin).address();
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };

        let vault = ClammVaultClient::new(env, &env.register(ClammVault, ()));
        let pool = ClammPoolClient::new(env, &env.register(ClammPool, ()));
        let factory = Address::generate(env);
        let fee_recipient = Address::generate(env);

        pool.initialize(&PoolParams {
            factory: factory.clone(),
            vault: vault.address.clone(),
            fee_recipient: fee_recipient.clone(),
            protocol_fee_bps,
            token0: token0.clone(),
            token1: token1.clone(),
            swap_fee,
            sqrt_price_x96,
        });

        Self {
            env,
            pool,
            vault,
            token0,
            token1,
            factory,
            fee_recipient,
            lp: Address::generate(env),
        }
    }

    /// Credit `amount` of `token` to the pool's vault account
    pub fn deposit(&self, token: &Address, amount: u128) {
        if amount == 0 {
            return;
        }
        let funder = Address::generate(self.env);
        StellarAssetClient::new(self.env, token).mint(&funder, &(amount as i128));
        self.vault
            .deposit(token, &funder, &self.pool.address, &amount);
    }

    /// Deposit exactly what `liquidity` needs and mint it to `lp`
    pub fn mint_position(
        &self,
        lower_hint: i32,
        lower: i32,
        upper_hint: i32,
        upper: i32,
        liquidity: u128,
    ) -> (u128, u128) {
        let amounts = get_amounts_for_liquidity(
            self.pool.price(),
            price_at_tick(lower).unwrap(),
            price_at_tick(upper).unwrap(),
            liquidity,
            true,
        )
        .unwrap();
        self.deposit(&self.token0, amounts.0);
        self.deposit(&self.token1, amounts.1);
        self.pool
            .mint(&lower_hint, &lower, &upper_hint, &upper, &liquidity, &self.lp);
        amounts
    }

    /// Deposit the input token and swap it, paying vault shares to `recipient`
    pub fn swap(&self, zero_for_one: bool, amount_in: u128, recipient: &Address) -> u128 {
        let token_in = if zero_for_one {
            &self.token0
        } else {
            &self.token1
        };
        self.deposit(token_in, amount_in);
        self.pool
            .swap(&zero_for_one, &amount_in, recipient, &false)
    }

    pub fn token_balance(&self, token: &Address, owner: &Address) -> u128 {
        TokenClient::new(self.env, token).balance(owner) as u128
    }

    pub fn assert_invariants(&self) {
        let result = self
            .env
            .as_contract(&self.pool.address, || invariants::check_all(self.env));
        assert_eq!(result, Ok(()));
    }
}
