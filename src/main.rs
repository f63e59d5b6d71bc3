use anyhow::{anyhow, Result};
use serde::Serialize;
use stableswap_pair_rs::utils::parse_amount;
use stableswap_pair_rs::{load_from_file, Address, Pair, Token, TokenAmount};
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct PairExport {
    pair: String,
    curve: String,
    liquidity_token: String,
    token0: String,
    token1: String,
    reserve0: String,
    reserve1: String,
    invariant: String,
}

#[derive(Serialize)]
struct SwapExport {
    token_in: String,
    amount_in: String,
    token_out: String,
    amount_out: String,
    next: PairExport,
}

#[derive(Serialize)]
struct LiquidityExport {
    token: String,
    amount: String,
}

fn pair_to_export(pair: &Pair) -> PairExport {
    PairExport {
        pair: pair.name(),
        curve: pair.curve().name().to_string(),
        liquidity_token: pair.liquidity_token().address.to_string(),
        token0: pair.token0().address.to_string(),
        token1: pair.token1().address.to_string(),
        reserve0: pair.reserve0().raw().to_string(),
        reserve1: pair.reserve1().raw().to_string(),
        invariant: pair.invariant().to_string(),
    }
}

fn swap_to_export(amount_in: &TokenAmount, amount_out: &TokenAmount, next: &Pair) -> SwapExport {
    SwapExport {
        token_in: amount_in.token.address.to_string(),
        amount_in: amount_in.raw().to_string(),
        token_out: amount_out.token.address.to_string(),
        amount_out: amount_out.raw().to_string(),
        next: pair_to_export(next),
    }
}

fn print_usage(bin: &str) {
    eprintln!("Usage:");
    eprintln!("  {} <snapshot.json> <command> [args...]", bin);
    eprintln!();
    eprintln!("  info                                  → pair reserves and invariant");
    eprintln!("  out <token> <amount>                  → exact-in quote");
    eprintln!("  in <token> <amount>                   → exact-out quote (token = output token)");
    eprintln!("  mint <supply> <amount0> <amount1>     → liquidity minted for a deposit");
    eprintln!("  value <token> <supply> <liquidity> [k_last]");
    eprintln!("                                        → underlying value, protocol fee on when k_last is given");
    eprintln!();
    eprintln!("  Amounts are raw integers in the token's smallest unit.");
    eprintln!("  Set RUST_LOG=debug to trace solver steps on stderr.");
}

fn find_token<'a>(pair: &'a Pair, text: &str) -> Result<&'a Token> {
    let address: Address = text.parse()?;
    [pair.token0(), pair.token1()]
        .into_iter()
        .find(|t| t.address == address)
        .ok_or_else(|| anyhow!("token {} is not part of pair {}", address, pair.name()))
}

fn amount_of(token: &Token, text: &str) -> Result<TokenAmount> {
    Ok(TokenAmount::new(token.clone(), parse_amount(text)?)?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let snapshot = load_from_file(&args[1])?;
    let pair = snapshot.into_pair()?;
    let rest = &args[3..];

    let json = match (args[2].as_str(), rest.len()) {
        ("info", 0) => serde_json::to_string_pretty(&pair_to_export(&pair))?,
        ("out", 2) => {
            let amount_in = amount_of(find_token(&pair, &rest[0])?, &rest[1])?;
            let (amount_out, next) = pair.get_output_amount(&amount_in)?;
            serde_json::to_string_pretty(&swap_to_export(&amount_in, &amount_out, &next))?
        }
        ("in", 2) => {
            let amount_out = amount_of(find_token(&pair, &rest[0])?, &rest[1])?;
            let (amount_in, next) = pair.get_input_amount(&amount_out)?;
            serde_json::to_string_pretty(&swap_to_export(&amount_in, &amount_out, &next))?
        }
        ("mint", 3) => {
            let supply = amount_of(pair.liquidity_token(), &rest[0])?;
            let amount0 = amount_of(pair.token0(), &rest[1])?;
            let amount1 = amount_of(pair.token1(), &rest[2])?;
            let minted = pair.get_liquidity_minted(&supply, &amount0, &amount1)?;
            serde_json::to_string_pretty(&LiquidityExport {
                token: minted.token.address.to_string(),
                amount: minted.raw().to_string(),
            })?
        }
        ("value", 3) | ("value", 4) => {
            let token = find_token(&pair, &rest[0])?;
            let supply = amount_of(pair.liquidity_token(), &rest[1])?;
            let liquidity = amount_of(pair.liquidity_token(), &rest[2])?;
            let k_last = rest.get(3).map(|k| parse_amount(k)).transpose()?;
            let value = pair.get_liquidity_value(
                token,
                &supply,
                &liquidity,
                k_last.is_some(),
                k_last.as_ref(),
            )?;
            serde_json::to_string_pretty(&LiquidityExport {
                token: value.token.address.to_string(),
                amount: value.raw().to_string(),
            })?
        }
        (other, _) => {
            eprintln!("Unknown command or wrong argument count: '{}'", other);
            print_usage(&args[0]);
            std::process::exit(1);
        }
    };

    println!("{}", json);
    Ok(())
}
