//! Embedded challenge catalog.
//!
//! Compiled into the binary and used whenever the challenge files cannot all
//! be loaded. Ids and order match the published `challenges/*.json` files.

use crate::model::Challenge;

/// Number of challenges in the embedded catalog.
pub const BUILTIN_CHALLENGE_COUNT: usize = 5;

/// The embedded catalog, in tutorial order.
#[must_use]
pub fn builtin_challenges() -> Vec<Challenge> {
    vec![
        Challenge::from_parts(
            "connect",
            CONNECT_TITLE,
            CONNECT_DESCRIPTION,
            CONNECT_CODE,
            CONNECT_SOLUTION,
            CONNECT_HINT,
        ),
        Challenge::from_parts(
            "wallet",
            WALLET_TITLE,
            WALLET_DESCRIPTION,
            WALLET_CODE,
            WALLET_SOLUTION,
            WALLET_HINT,
        ),
        Challenge::from_parts(
            "send-xrp",
            SEND_XRP_TITLE,
            SEND_XRP_DESCRIPTION,
            SEND_XRP_CODE,
            SEND_XRP_SOLUTION,
            SEND_XRP_HINT,
        ),
        Challenge::from_parts(
            "check-transaction",
            CHECK_TX_TITLE,
            CHECK_TX_DESCRIPTION,
            CHECK_TX_CODE,
            CHECK_TX_SOLUTION,
            CHECK_TX_HINT,
        ),
        Challenge::from_parts(
            "escrow",
            ESCROW_TITLE,
            ESCROW_DESCRIPTION,
            ESCROW_CODE,
            ESCROW_SOLUTION,
            ESCROW_HINT,
        ),
    ]
}

// ─── Challenge 1 ───────────────────────────────────────────────────────────────

const CONNECT_TITLE: &str = "Challenge 1: Connect to the XRP Ledger";

const CONNECT_DESCRIPTION: &str = "In this challenge, you need to connect to the XRP Ledger TestNet. Fill in the missing parameter in the connectToLedger function.";

const CONNECT_CODE: &str = r#"async function connectToLedger() {
  // CHALLENGE: Replace 'YOUR_TESTNET_URL' with the correct WebSocket URL for the XRP Ledger TestNet
  const client = new xrpl.Client('YOUR_TESTNET_URL');

  try {
    await client.connect();
    return client;
  } catch (error) {
    console.error("Connection error:", error);
    throw error;
  }
}

// Test the connection
async function testConnection() {
  try {
    const client = await connectToLedger();
    console.log("Successfully connected to the XRP Ledger!");

    // Get server info to verify connection
    const serverInfo = await client.request({
      command: "server_info"
    });

    console.log("Server info:", serverInfo.result.info.build_version);
    client.disconnect();
    return true;
  } catch (error) {
    console.error("Test failed:", error);
    return false;
  }
}

// Run the test
testConnection();"#;

const CONNECT_SOLUTION: &str = "wss://s.altnet.rippletest.net:51233";

const CONNECT_HINT: &str = "The XRP Ledger TestNet is accessible via the WebSocket URL: wss://s.altnet.rippletest.net:51233";

// ─── Challenge 2 ───────────────────────────────────────────────────────────────

const WALLET_TITLE: &str = "Challenge 2: Create a TestNet Wallet";

const WALLET_DESCRIPTION: &str = "Now that we can connect to the TestNet, let's create a new funded wallet. Complete the createTestWallet function to generate a new wallet and fund it using the TestNet faucet.";

const WALLET_CODE: &str = r#"async function connectToLedger() {
  const client = new xrpl.Client('wss://s.altnet.rippletest.net:51233');
  await client.connect();
  return client;
}

async function createTestWallet(client) {
  try {
    // CHALLENGE: Use the client to create a funded wallet on the TestNet
    // HINT: Look up the fundWallet method

    // Replace this line with your code
    const fundedWallet = null;

    console.log("Wallet created with address:", fundedWallet.wallet.address);
    console.log("Wallet has balance:", await getXRPBalance(client, fundedWallet.wallet.address));

    return fundedWallet.wallet;
  } catch (error) {
    console.error("Error creating wallet:", error);
    throw error;
  }
}

async function getXRPBalance(client, address) {
  const response = await client.request({
    command: "account_info",
    account: address,
    ledger_index: "validated"
  });

  return xrpl.dropsToXrp(response.result.account_data.Balance);
}

// Test the wallet creation
async function testWalletCreation() {
  let client;
  try {
    client = await connectToLedger();
    const wallet = await createTestWallet(client);
    console.log("Test successful! Created wallet with address:", wallet.address);
    return true;
  } catch (error) {
    console.error("Test failed:", error);
    return false;
  } finally {
    if (client) client.disconnect();
  }
}

// Run the test
testWalletCreation();"#;

const WALLET_SOLUTION: &str = "const fundedWallet = await client.fundWallet();";

const WALLET_HINT: &str = "Use client.fundWallet() to generate a new wallet and fund it with the TestNet faucet.";

// ─── Challenge 3 ───────────────────────────────────────────────────────────────

const SEND_XRP_TITLE: &str = "Challenge 3: Send XRP Payment";

const SEND_XRP_DESCRIPTION: &str = "Let's create a function to send XRP from one wallet to another. Complete the sendXRP function by filling in the missing transaction details.";

const SEND_XRP_CODE: &str = r#"async function connectToLedger() {
  const client = new xrpl.Client('wss://s.altnet.rippletest.net:51233');
  await client.connect();
  return client;
}

async function sendXRP(client, senderWallet, destinationAddress, amount) {
  try {
    // CHALLENGE: Create a Payment transaction to send XRP
    // Convert the amount to drops (XRP's smallest unit)
    const drops = xrpl.xrpToDrops(amount);

    // CHALLENGE: Construct the payment transaction object with:
    // - TransactionType: 'Payment'
    // - Account: sender's address
    // - Destination: recipient's address
    // - Amount: amount in drops

    // Replace this with your payment transaction object
    const payment = {
      // Fill in the required properties here
    };

    // Prepare, sign, and submit the transaction
    const prepared = await client.autofill(payment);
    const signed = senderWallet.sign(prepared);
    const result = await client.submitAndWait(signed.tx_blob);

    if (result.result.meta.TransactionResult === "tesSUCCESS") {
      console.log(`Payment of ${amount} XRP sent successfully to ${destinationAddress}`);
      console.log(`Transaction hash: ${result.result.hash}`);
      return true;
    } else {
      console.error("Transaction failed:", result.result.meta.TransactionResult);
      return false;
    }
  } catch (error) {
    console.error("Error sending XRP:", error);
    return false;
  }
}

// Test sending XRP
async function testSendXRP() {
  let client;
  try {
    client = await connectToLedger();

    // Create two test wallets
    const wallet1 = (await client.fundWallet()).wallet;
    const wallet2 = (await client.fundWallet()).wallet;

    console.log("Sender address:", wallet1.address);
    console.log("Receiver address:", wallet2.address);

    // Send 10 XRP from wallet1 to wallet2
    const success = await sendXRP(client, wallet1, wallet2.address, "10");

    if (success) {
      console.log("Payment test completed successfully!");
    } else {
      console.log("Payment test failed.");
    }

    return success;
  } catch (error) {
    console.error("Test failed:", error);
    return false;
  } finally {
    if (client) client.disconnect();
  }
}

// Run the test
testSendXRP();"#;

const SEND_XRP_SOLUTION: &str = r#"const payment = {
  TransactionType: 'Payment',
  Account: senderWallet.address,
  Destination: destinationAddress,
  Amount: drops
};"#;

const SEND_XRP_HINT: &str = r#"The payment object should have 4 properties: TransactionType ("Payment"), Account (sender's address), Destination (recipient's address), and Amount (the XRP amount in drops)."#;

// ─── Challenge 4 ───────────────────────────────────────────────────────────────

const CHECK_TX_TITLE: &str = "Challenge 4: Verify Transaction Status";

const CHECK_TX_DESCRIPTION: &str = "Let's create a function to check the status of a transaction. Complete the checkTransaction function to retrieve and verify a transaction by its hash.";

const CHECK_TX_CODE: &str = r#"async function connectToLedger() {
  const client = new xrpl.Client('wss://s.altnet.rippletest.net:51233');
  await client.connect();
  return client;
}

async function checkTransaction(client, transactionHash) {
  try {
    // CHALLENGE: Create a request to fetch transaction information
    // - Use the 'tx' command
    // - Include the transaction hash

    // Replace this with your request object
    const request = {
      // Fill in the required properties here
    };

    const response = await client.request(request);

    // Process and display transaction information
    if (response.result.validated) {
      console.log("Transaction found!");
      console.log("Status:", response.result.meta.TransactionResult);

      if (response.result.TransactionType === "Payment") {
        const amount = response.result.Amount;
        const isXRP = typeof amount === "string";

        if (isXRP) {
          console.log("Payment amount:", xrpl.dropsToXrp(amount), "XRP");
        } else {
          console.log("Payment is for an issued currency");
        }

        console.log("From:", response.result.Account);
        console.log("To:", response.result.Destination);
      }

      return true;
    } else {
      console.log("Transaction not yet validated");
      return false;
    }
  } catch (error) {
    console.error("Error checking transaction:", error);
    return false;
  }
}

// Test checking a transaction
async function testCheckTransaction() {
  let client;
  try {
    client = await connectToLedger();

    // We'll send a transaction to get a transaction hash to check
    const wallet1 = (await client.fundWallet()).wallet;
    const wallet2 = (await client.fundWallet()).wallet;

    // Send a payment to get a hash
    const payment = {
      TransactionType: 'Payment',
      Account: wallet1.address,
      Destination: wallet2.address,
      Amount: xrpl.xrpToDrops("5")
    };

    const prepared = await client.autofill(payment);
    const signed = wallet1.sign(prepared);
    const result = await client.submitAndWait(signed.tx_blob);

    const txHash = result.result.hash;
    console.log("Created transaction with hash:", txHash);

    // Now check the transaction
    const success = await checkTransaction(client, txHash);

    if (success) {
      console.log("Transaction check completed successfully!");
    } else {
      console.log("Transaction check failed.");
    }

    return success;
  } catch (error) {
    console.error("Test failed:", error);
    return false;
  } finally {
    if (client) client.disconnect();
  }
}

// Run the test
testCheckTransaction();"#;

const CHECK_TX_SOLUTION: &str = r#"const request = {
  command: 'tx',
  transaction: transactionHash
};"#;

const CHECK_TX_HINT: &str = r#"The request object should have 2 properties: command (set to "tx") and transaction (the transaction hash you want to look up)."#;

// ─── Challenge 5 ───────────────────────────────────────────────────────────────

const ESCROW_TITLE: &str = "Challenge 5: Create an Escrow";

const ESCROW_DESCRIPTION: &str = "Let's create an escrow payment. Escrows are time-locked payments that can be released after a specific time. Complete the createEscrow function to set up a time-based escrow payment.";

const ESCROW_CODE: &str = r#"async function connectToLedger() {
  const client = new xrpl.Client('wss://s.altnet.rippletest.net:51233');
  await client.connect();
  return client;
}

async function createEscrow(client, senderWallet, destinationAddress, amount, finishAfter) {
  try {
    // Convert the amount to drops
    const drops = xrpl.xrpToDrops(amount);

    // Calculate finish time (finishAfter is in seconds from now)
    const date = new Date();
    date.setSeconds(date.getSeconds() + finishAfter);

    // CHALLENGE: Create an EscrowCreate transaction
    // - TransactionType: 'EscrowCreate'
    // - Account: sender's address
    // - Destination: recipient's address
    // - Amount: amount in drops
    // - FinishAfter: ripple time when the escrow can be finished (use xrpl.isoTimeToRippleTime())

    // Replace this with your escrow transaction object
    const escrowCreate = {
      // Fill in the required properties here
    };

    // Prepare, sign, and submit the transaction
    const prepared = await client.autofill(escrowCreate);
    const signed = senderWallet.sign(prepared);
    const result = await client.submitAndWait(signed.tx_blob);

    if (result.result.meta.TransactionResult === "tesSUCCESS") {
      console.log(`Escrow created successfully!`);
      console.log(`Sequence number (needed for finishing): ${prepared.Sequence}`);
      console.log(`Transaction hash: ${result.result.hash}`);
      return {
        success: true,
        sequence: prepared.Sequence,
        hash: result.result.hash
      };
    } else {
      console.error("Transaction failed:", result.result.meta.TransactionResult);
      return { success: false };
    }
  } catch (error) {
    console.error("Error creating escrow:", error);
    return { success: false };
  }
}

// Test creating an escrow
async function testCreateEscrow() {
  let client;
  try {
    client = await connectToLedger();

    // Create two test wallets
    const wallet1 = (await client.fundWallet()).wallet;
    const wallet2 = (await client.fundWallet()).wallet;

    console.log("Sender address:", wallet1.address);
    console.log("Receiver address:", wallet2.address);

    // Create an escrow that can be finished after 60 seconds
    const result = await createEscrow(client, wallet1, wallet2.address, "20", 60);

    if (result.success) {
      console.log("Escrow test completed successfully!");
    } else {
      console.log("Escrow test failed.");
    }

    return result.success;
  } catch (error) {
    console.error("Test failed:", error);
    return false;
  } finally {
    if (client) client.disconnect();
  }
}

// Run the test
testCreateEscrow();"#;

const ESCROW_SOLUTION: &str = r#"const escrowCreate = {
  TransactionType: 'EscrowCreate',
  Account: senderWallet.address,
  Destination: destinationAddress,
  Amount: drops,
  FinishAfter: xrpl.isoTimeToRippleTime(date.toISOString())
};"#;

const ESCROW_HINT: &str = r#"The escrowCreate object needs 5 properties: TransactionType ("EscrowCreate"), Account (sender's address), Destination (recipient's address), Amount (drops), and FinishAfter (ripple time calculated with xrpl.isoTimeToRippleTime())."#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::Validator;
    use std::collections::HashSet;

    #[test]
    fn builtin_catalog_has_unique_ordered_ids() {
        let challenges = builtin_challenges();
        assert_eq!(challenges.len(), BUILTIN_CHALLENGE_COUNT);

        let ids: Vec<&str> = challenges.iter().map(|c| c.id().as_str()).collect();
        assert_eq!(
            ids,
            ["connect", "wallet", "send-xrp", "check-transaction", "escrow"]
        );
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn every_builtin_challenge_has_a_rule() {
        let validator = Validator::with_builtin_rules();
        for challenge in builtin_challenges() {
            assert!(validator.has_rule(challenge.id().as_str()));
        }
    }

    #[test]
    fn starter_code_fails_and_solution_spliced_in_passes() {
        let validator = Validator::with_builtin_rules();
        for challenge in builtin_challenges() {
            let id = challenge.id().as_str();
            let verdict = validator.check(id, challenge.starter_code()).unwrap();
            assert!(!verdict.pass, "{id} starter code should not pass");

            let with_solution = format!("{}\n{}", challenge.starter_code(), challenge.solution());
            let submission = if id == "connect" {
                challenge
                    .starter_code()
                    .replace("YOUR_TESTNET_URL", challenge.solution())
            } else {
                with_solution
            };
            let verdict = validator.check(id, &submission).unwrap();
            assert!(verdict.pass, "{id} solution should pass");
        }
    }
}
