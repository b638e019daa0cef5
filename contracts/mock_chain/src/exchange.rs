use near_sdk::{env, AccountId};
use reinvest_vault::error::{VaultError, VaultResult};
use reinvest_vault::external::{AddLiquidity, ExchangeVenue, LiquidityAdded};
use reinvest_vault::vault_standards::mul_div::{apply_bps_haircut, mul_div, Rounding};

use crate::MockChain;

const FEE_NUMERATOR: u128 = 997;
const FEE_DENOMINATOR: u128 = 1_000;

/// Constant-product pair. Its reserves are held by the exchange account.
#[derive(Clone, Debug)]
pub struct Pair {
    pub token_a: AccountId,
    pub token_b: AccountId,
    pub reserve_a: u128,
    pub reserve_b: u128,
    pub lp_token: AccountId,
}

impl Pair {
    fn reserves(&self, token_in: &AccountId) -> (u128, u128) {
        if *token_in == self.token_a {
            (self.reserve_a, self.reserve_b)
        } else {
            (self.reserve_b, self.reserve_a)
        }
    }

    fn add_reserves(&mut self, token_in: &AccountId, amount_in: u128, amount_out: u128) -> VaultResult<()> {
        let (reserve_in, reserve_out) = if *token_in == self.token_a {
            (&mut self.reserve_a, &mut self.reserve_b)
        } else {
            (&mut self.reserve_b, &mut self.reserve_a)
        };
        *reserve_in = reserve_in.checked_add(amount_in).ok_or(VaultError::ArithmeticOverflow)?;
        *reserve_out = reserve_out.checked_sub(amount_out).ok_or(VaultError::ArithmeticOverflow)?;
        Ok(())
    }
}

/// `amount_in * 997 * reserve_out / (reserve_in * 1000 + amount_in * 997)`
pub fn get_amount_out(amount_in: u128, reserve_in: u128, reserve_out: u128) -> VaultResult<u128> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(VaultError::DivisionByZero);
    }
    let amount_in_with_fee = amount_in
        .checked_mul(FEE_NUMERATOR)
        .ok_or(VaultError::ArithmeticOverflow)?;
    let denominator = reserve_in
        .checked_mul(FEE_DENOMINATOR)
        .and_then(|value| value.checked_add(amount_in_with_fee))
        .ok_or(VaultError::ArithmeticOverflow)?;
    mul_div(amount_in_with_fee, reserve_out, denominator, Rounding::Down)
}

impl MockChain {
    /// Registers a pair funded by `holder`, who receives `lp_supply` liquidity tokens.
    #[allow(clippy::too_many_arguments)]
    pub fn seed_pair(
        &mut self,
        token_a: AccountId,
        token_b: AccountId,
        reserve_a: u128,
        reserve_b: u128,
        lp_token: AccountId,
        lp_supply: u128,
        holder: &AccountId,
    ) {
        let exchange_id = self.exchange_id.clone();
        self.mint(&token_a, &exchange_id, reserve_a);
        self.mint(&token_b, &exchange_id, reserve_b);
        self.mint(&lp_token, holder, lp_supply);
        self.pairs.push(Pair {
            token_a,
            token_b,
            reserve_a,
            reserve_b,
            lp_token,
        });
    }

    pub fn pair(&self, token_a: &AccountId, token_b: &AccountId) -> Option<&Pair> {
        self.pairs.iter().find(|pair| {
            (pair.token_a == *token_a && pair.token_b == *token_b)
                || (pair.token_a == *token_b && pair.token_b == *token_a)
        })
    }

    fn pair_index(&self, token_a: &AccountId, token_b: &AccountId) -> VaultResult<usize> {
        self.pairs
            .iter()
            .position(|pair| {
                (pair.token_a == *token_a && pair.token_b == *token_b)
                    || (pair.token_a == *token_b && pair.token_b == *token_a)
            })
            .ok_or_else(|| {
                VaultError::venue(&self.exchange_id, format!("no pair {}/{}", token_a, token_b))
            })
    }

    fn check_deadline(&self, deadline: u64) -> VaultResult<()> {
        let now = env::block_timestamp().saturating_add(self.execution_delay_ns);
        if deadline < now {
            return Err(VaultError::venue(&self.exchange_id, "expired"));
        }
        Ok(())
    }
}

impl ExchangeVenue for MockChain {
    fn get_amounts_out(&self, amount_in: u128, path: &[AccountId]) -> VaultResult<Vec<u128>> {
        if path.len() < 2 {
            return Err(VaultError::venue(&self.exchange_id, "invalid path"));
        }
        let mut amounts = vec![amount_in];
        for hop in path.windows(2) {
            let pair = &self.pairs[self.pair_index(&hop[0], &hop[1])?];
            let (reserve_in, reserve_out) = pair.reserves(&hop[0]);
            let last = amounts[amounts.len() - 1];
            amounts.push(get_amount_out(last, reserve_in, reserve_out)?);
        }
        Ok(amounts)
    }

    fn swap_exact_tokens_for_tokens(
        &mut self,
        caller: &AccountId,
        amount_in: u128,
        amount_out_min: u128,
        path: &[AccountId],
        to: &AccountId,
        deadline: u64,
    ) -> VaultResult<Vec<u128>> {
        if self.failures.swap {
            return Err(VaultError::venue(&self.exchange_id, "swap rejected"));
        }
        self.check_deadline(deadline)?;

        let mut amounts = self.get_amounts_out(amount_in, path)?;
        let last = amounts.len() - 1;
        amounts[last] = apply_bps_haircut(amounts[last], self.swap_haircut_bps)?;
        if amounts[last] < amount_out_min {
            return Err(VaultError::SlippageExceeded {
                min_out: amount_out_min,
                actual: amounts[last],
            });
        }

        let exchange_id = self.exchange_id.clone();
        self.pull(&path[0], &exchange_id, caller, &exchange_id, amount_in)?;
        for (i, hop) in path.windows(2).enumerate() {
            let index = self.pair_index(&hop[0], &hop[1])?;
            self.pairs[index].add_reserves(&hop[0], amounts[i], amounts[i + 1])?;
        }
        self.move_tokens(&path[last], &exchange_id, to, amounts[last])?;

        self.record(format!(
            "exchange.swap {}->{} amount_in={} amount_out={}",
            path[0], path[last], amount_in, amounts[last]
        ));
        Ok(amounts)
    }

    fn add_liquidity(&mut self, caller: &AccountId, request: AddLiquidity) -> VaultResult<LiquidityAdded> {
        if self.failures.add_liquidity {
            return Err(VaultError::venue(&self.exchange_id, "add_liquidity rejected"));
        }
        self.check_deadline(request.deadline)?;

        let index = self.pair_index(&request.token_a, &request.token_b)?;
        let (reserve_a, reserve_b) = self.pairs[index].reserves(&request.token_a);
        if reserve_a == 0 || reserve_b == 0 {
            return Err(VaultError::venue(&self.exchange_id, "empty pair"));
        }

        let optimal_b = mul_div(request.amount_a_desired, reserve_b, reserve_a, Rounding::Down)?;
        let (used_a, used_b) = if optimal_b <= request.amount_b_desired {
            (request.amount_a_desired, optimal_b)
        } else {
            let optimal_a = mul_div(request.amount_b_desired, reserve_a, reserve_b, Rounding::Down)?;
            (optimal_a, request.amount_b_desired)
        };
        if used_a < request.amount_a_min || used_b < request.amount_b_min {
            return Err(VaultError::venue(&self.exchange_id, "insufficient amount"));
        }

        let lp_token = self.pairs[index].lp_token.clone();
        let lp_supply = self.total_supply(&lp_token);
        let liquidity = mul_div(used_a, lp_supply, reserve_a, Rounding::Down)?
            .min(mul_div(used_b, lp_supply, reserve_b, Rounding::Down)?);
        if liquidity == 0 {
            return Err(VaultError::venue(&self.exchange_id, "insufficient liquidity minted"));
        }

        let exchange_id = self.exchange_id.clone();
        self.pull(&request.token_a, &exchange_id, caller, &exchange_id, used_a)?;
        self.pull(&request.token_b, &exchange_id, caller, &exchange_id, used_b)?;
        self.credit(&lp_token, &request.to, liquidity)?;

        let pair = &mut self.pairs[index];
        if pair.token_a == request.token_a {
            pair.reserve_a += used_a;
            pair.reserve_b += used_b;
        } else {
            pair.reserve_a += used_b;
            pair.reserve_b += used_a;
        }

        self.record(format!(
            "exchange.add_liquidity used_a={} used_b={} liquidity={}",
            used_a, used_b, liquidity
        ));
        Ok(LiquidityAdded {
            used_a,
            used_b,
            liquidity,
        })
    }
}
