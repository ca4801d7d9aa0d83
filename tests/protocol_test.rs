use std::collections::HashMap;

use num_bigint::{BigInt, BigUint};
use num_traits::One;

use nimc::error::Error;
use nimc::math::modular::Element;
use nimc::node::{Coord, Node};
use nimc::params::Params;
use nimc::protocol;
use nimc::utils::prg::Prg;

fn make_nodes(count: usize) -> Vec<Node> {
    (0..count).map(|_| Node::new()).collect()
}

fn element(value: u64, modulus: &BigUint) -> Element {
    Element::new(BigUint::from(value), modulus)
}

/// Runs a full protocol instance: preprocessing, per-contributor masking,
/// broadcast, and reconstruction from the node shares.
fn evaluate(
    signature: &[usize],
    partition: &[&[(Coord, u64)]],
    node_count: usize,
    prg: &mut Prg,
) -> BigUint {
    let mut nodes = make_nodes(node_count);
    let p = nodes[0].params().p.clone();
    protocol::preprocess(signature, &mut nodes, prg).unwrap();

    let mut broadcast = Vec::new();
    for owned in partition {
        let inputs: HashMap<Coord, Element> = owned
            .iter()
            .map(|&(coord, value)| (coord, element(value, &p)))
            .collect();
        let coords: Vec<Coord> = inputs.keys().copied().collect();
        let masks: Vec<_> = nodes
            .iter()
            .map(|node| node.masks(&coords).unwrap())
            .collect();
        broadcast.push(protocol::mask_inputs(&inputs, &masks).unwrap());
    }

    let mut result = element(0, &p);
    for node in &nodes {
        result = result.add(&node.compute(signature, &broadcast).unwrap());
    }
    result.value().clone()
}

#[test]
fn split_sum_reconstructs_secret() {
    let mut prg = Prg::new(&[7]);
    let modulus = BigUint::from(9973u32);
    let secret = BigInt::from(1234);

    let shares = protocol::split(&secret, &modulus, 5, &mut prg).unwrap();
    assert_eq!(shares.len(), 5);

    let mut sum = element(0, &modulus);
    for share in &shares {
        sum = sum.add(share);
    }
    assert_eq!(sum.value(), &BigUint::from(1234u32));
}

#[test]
fn split_single_share_is_the_secret() {
    let mut prg = Prg::new(&[7]);
    let modulus = BigUint::from(97u32);

    let shares = protocol::split(&BigInt::from(42), &modulus, 1, &mut prg).unwrap();
    assert_eq!(shares.len(), 1);
    assert_eq!(shares[0].value(), &BigUint::from(42u32));
}

#[test]
fn split_negative_secret_reduces() {
    let mut prg = Prg::new(&[7]);
    let modulus = BigUint::from(97u32);

    let shares = protocol::split(&BigInt::from(-5), &modulus, 3, &mut prg).unwrap();
    let mut sum = element(0, &modulus);
    for share in &shares {
        sum = sum.add(share);
    }
    assert_eq!(sum.value(), &BigUint::from(92u32));
}

#[test]
fn split_rejects_zero_quantity() {
    let mut prg = Prg::new(&[7]);
    let modulus = BigUint::from(97u32);

    let result = protocol::split(&BigInt::from(1), &modulus, 0, &mut prg);
    assert!(matches!(result, Err(Error::Parameter(_))));
}

#[test]
fn split_rejects_zero_modulus() {
    let mut prg = Prg::new(&[7]);

    let result = protocol::split(&BigInt::from(1), &BigUint::from(0u32), 3, &mut prg);
    assert!(matches!(result, Err(Error::Parameter(_))));
}

#[test]
fn preprocessing_mask_table_invariants() {
    let signatures: [&[usize]; 3] = [&[1], &[3, 2], &[2, 2, 2]];

    for (sig_index, signature) in signatures.iter().enumerate() {
        for node_count in [1, 2, 3, 5] {
            let mut prg = Prg::new(&[sig_index as u8, node_count as u8]);
            let mut nodes = make_nodes(node_count);
            let p = nodes[0].params().p.clone();
            protocol::preprocess(signature, &mut nodes, &mut prg).unwrap();

            let one = Element::new(BigUint::one(), &p);
            for (term_index, &factor_count) in signature.iter().enumerate() {
                let mut share_sum = element(0, &p);
                let mut diagnostic_product = one.clone();

                for node in &nodes {
                    let coords: Vec<Coord> =
                        (0..factor_count).map(|j| (term_index, j)).collect();
                    let masks = node.masks(&coords).unwrap();

                    // The node's factor masks multiply to the inverse of its
                    // diagnostic mask g^{e_t^{(n)}}.
                    let mut mask_product = one.clone();
                    for factor_index in 0..factor_count {
                        mask_product =
                            mask_product.multiply(&masks[&(term_index, factor_index)]);
                    }
                    let diagnostic = node.term_mask(term_index).unwrap();
                    assert_eq!(mask_product.multiply(diagnostic), one);

                    share_sum = share_sum.add(node.output_share(term_index).unwrap());
                    diagnostic_product = diagnostic_product.multiply(diagnostic);
                }

                // Both sides equal g^{e_t}: the summed output shares and the
                // product of the per-node diagnostics.
                assert_eq!(share_sum, diagnostic_product);
            }
        }
    }
}

#[test]
fn masks_cover_exactly_the_requested_coordinates() {
    let mut prg = Prg::new(&[3]);
    let mut nodes = make_nodes(2);
    protocol::preprocess(&[3, 2], &mut nodes, &mut prg).unwrap();

    let coords = [(0, 0), (0, 2), (1, 1)];
    let masks = nodes[0].masks(&coords).unwrap();
    assert_eq!(masks.len(), coords.len());
    for coord in coords {
        assert!(masks.contains_key(&coord));
    }
}

#[test]
fn evaluates_two_term_expression_across_three_contributors() {
    let mut prg = Prg::new(&[11]);
    let partition: [&[(Coord, u64)]; 3] = [
        &[((0, 0), 1), ((1, 0), 4)],
        &[((0, 1), 2), ((1, 1), 5)],
        &[((0, 2), 3)],
    ];

    let result = evaluate(&[3, 2], &partition, 3, &mut prg);
    assert_eq!(result, BigUint::from(26u32));
}

#[test]
fn evaluates_single_factor_expression() {
    let mut prg = Prg::new(&[12]);
    let partition: [&[(Coord, u64)]; 1] = [&[((0, 0), 7)]];

    let result = evaluate(&[1], &partition, 3, &mut prg);
    assert_eq!(result, BigUint::from(7u32));
}

#[test]
fn evaluates_three_products_of_two() {
    let mut prg = Prg::new(&[13]);
    let partition: [&[(Coord, u64)]; 2] = [
        &[((0, 0), 2), ((1, 0), 5), ((2, 0), 11)],
        &[((0, 1), 3), ((1, 1), 7), ((2, 1), 13)],
    ];

    let result = evaluate(&[2, 2, 2], &partition, 3, &mut prg);
    assert_eq!(result, BigUint::from(184u32));
}

#[test]
fn zero_factor_annihilates_a_term() {
    let mut prg = Prg::new(&[14]);
    let partition: [&[(Coord, u64)]; 1] =
        [&[((0, 0), 0), ((0, 1), 999), ((0, 2), 1), ((0, 3), 1)]];

    let result = evaluate(&[4], &partition, 3, &mut prg);
    assert_eq!(result, BigUint::from(0u32));
}

#[test]
fn maximal_values_round_trip() {
    let mut prg = Prg::new(&[15]);
    let mut nodes = make_nodes(3);
    let p = nodes[0].params().p.clone();
    let signature = [2];
    protocol::preprocess(&signature, &mut nodes, &mut prg).unwrap();

    let p_minus_one = Element::new(&p - BigUint::one(), &p);
    let mut inputs = HashMap::new();
    inputs.insert((0, 0), p_minus_one.clone());
    inputs.insert((0, 1), p_minus_one);
    let coords: Vec<Coord> = inputs.keys().copied().collect();
    let masks: Vec<_> = nodes
        .iter()
        .map(|node| node.masks(&coords).unwrap())
        .collect();
    let broadcast = vec![protocol::mask_inputs(&inputs, &masks).unwrap()];

    let mut result = element(0, &p);
    for node in &nodes {
        result = result.add(&node.compute(&signature, &broadcast).unwrap());
    }

    // (p - 1)^2 = 1 modulo p
    assert_eq!(result.value(), &BigUint::one());
}

#[test]
fn five_nodes_and_uneven_ownership() {
    let mut prg = Prg::new(&[16]);
    let partition: [&[(Coord, u64)]; 2] = [
        &[((0, 0), 1), ((0, 1), 2), ((1, 0), 4), ((1, 1), 5)],
        &[((0, 2), 3)],
    ];

    let result = evaluate(&[3, 2], &partition, 5, &mut prg);
    assert_eq!(result, BigUint::from(26u32));
}

#[test]
fn single_node_instance_degenerates_to_local_evaluation() {
    let mut prg = Prg::new(&[17]);
    let partition: [&[(Coord, u64)]; 3] = [
        &[((0, 0), 1), ((1, 0), 4)],
        &[((0, 1), 2), ((1, 1), 5)],
        &[((0, 2), 3)],
    ];

    let result = evaluate(&[3, 2], &partition, 1, &mut prg);
    assert_eq!(result, BigUint::from(26u32));
}

#[test]
fn contributor_without_coordinates_is_harmless() {
    let mut prg = Prg::new(&[18]);
    let partition: [&[(Coord, u64)]; 3] = [
        &[((0, 0), 6), ((0, 1), 7)],
        &[],
        &[],
    ];

    let result = evaluate(&[2], &partition, 2, &mut prg);
    assert_eq!(result, BigUint::from(42u32));
}

#[test]
fn independent_instances_reconstruct_the_same_value() {
    let partition: [&[(Coord, u64)]; 2] = [
        &[((0, 0), 9), ((1, 0), 3)],
        &[((0, 1), 5), ((1, 1), 8)],
    ];

    let mut prg_first = Prg::new(&[19]);
    let mut prg_second = Prg::new(&[20]);
    let first = evaluate(&[2, 2], &partition, 3, &mut prg_first);
    let second = evaluate(&[2, 2], &partition, 3, &mut prg_second);

    assert_eq!(first, BigUint::from(69u32));
    assert_eq!(first, second);
}

#[test]
fn fresh_node_rejects_masks_and_compute() {
    let node = Node::new();

    assert!(matches!(node.masks(&[(0, 0)]), Err(Error::State(_))));
    assert!(matches!(
        node.compute(&[1], &[HashMap::new()]),
        Err(Error::State(_))
    ));
    assert!(matches!(node.term_mask(0), Err(Error::State(_))));
}

#[test]
fn correlate_runs_only_once() {
    let mut prg = Prg::new(&[21]);
    let mut nodes = make_nodes(2);
    protocol::preprocess(&[2], &mut nodes, &mut prg).unwrap();

    let result = protocol::preprocess(&[2], &mut nodes, &mut prg);
    assert!(matches!(result, Err(Error::Protocol(_))));
}

#[test]
fn correlate_rejects_share_vectors_of_wrong_length() {
    let mut prg = Prg::new(&[22]);
    let mut node = Node::new();
    let params = node.params().clone();
    let two_q = params.exponent_modulus();

    let exponent_shares = vec![Element::new(BigUint::from(5u32), &two_q)];
    let output_shares = vec![
        element(1, &params.p),
        element(2, &params.p),
    ];

    let result = node.correlate(&[1, 1], exponent_shares, output_shares, &mut prg);
    assert!(matches!(result, Err(Error::Protocol(_))));
    assert!(!node.is_ready());
}

#[test]
fn masks_reject_unknown_coordinates() {
    let mut prg = Prg::new(&[23]);
    let mut nodes = make_nodes(2);
    protocol::preprocess(&[3, 2], &mut nodes, &mut prg).unwrap();

    assert!(matches!(
        nodes[0].masks(&[(0, 3)]),
        Err(Error::Protocol(_))
    ));
    assert!(matches!(
        nodes[0].masks(&[(2, 0)]),
        Err(Error::Protocol(_))
    ));
}

#[test]
fn compute_rejects_signature_disagreement() {
    let mut prg = Prg::new(&[24]);
    let mut nodes = make_nodes(2);
    let p = nodes[0].params().p.clone();
    protocol::preprocess(&[2], &mut nodes, &mut prg).unwrap();

    let mut broadcast = HashMap::new();
    broadcast.insert((0, 0), element(1, &p));
    broadcast.insert((0, 1), element(2, &p));

    let result = nodes[0].compute(&[2, 1], &[broadcast]);
    assert!(matches!(result, Err(Error::Protocol(_))));
}

#[test]
fn compute_rejects_missing_coordinate() {
    let mut prg = Prg::new(&[25]);
    let mut nodes = make_nodes(2);
    let p = nodes[0].params().p.clone();
    protocol::preprocess(&[2], &mut nodes, &mut prg).unwrap();

    let mut broadcast = HashMap::new();
    broadcast.insert((0, 0), element(1, &p));

    let result = nodes[0].compute(&[2], &[broadcast]);
    assert!(matches!(result, Err(Error::Protocol(_))));
}

#[test]
fn compute_rejects_duplicated_coordinate() {
    let mut prg = Prg::new(&[26]);
    let mut nodes = make_nodes(2);
    let p = nodes[0].params().p.clone();
    protocol::preprocess(&[2], &mut nodes, &mut prg).unwrap();

    let mut first = HashMap::new();
    first.insert((0, 0), element(1, &p));
    first.insert((0, 1), element(2, &p));
    let mut second = HashMap::new();
    second.insert((0, 1), element(3, &p));

    let result = nodes[0].compute(&[2], &[first, second]);
    assert!(matches!(result, Err(Error::Protocol(_))));
}

#[test]
fn compute_rejects_coordinate_outside_signature() {
    let mut prg = Prg::new(&[27]);
    let mut nodes = make_nodes(2);
    let p = nodes[0].params().p.clone();
    protocol::preprocess(&[2], &mut nodes, &mut prg).unwrap();

    let mut broadcast = HashMap::new();
    broadcast.insert((0, 0), element(1, &p));
    broadcast.insert((0, 1), element(2, &p));
    broadcast.insert((1, 0), element(3, &p));

    let result = nodes[0].compute(&[2], &[broadcast]);
    assert!(matches!(result, Err(Error::Protocol(_))));
}

#[test]
fn preprocess_rejects_malformed_signatures() {
    let mut prg = Prg::new(&[28]);

    let mut nodes = make_nodes(2);
    assert!(matches!(
        protocol::preprocess(&[], &mut nodes, &mut prg),
        Err(Error::Parameter(_))
    ));
    assert!(matches!(
        protocol::preprocess(&[2, 0, 1], &mut nodes, &mut prg),
        Err(Error::Parameter(_))
    ));
}

#[test]
fn preprocess_rejects_empty_node_list() {
    let mut prg = Prg::new(&[29]);
    let mut nodes: Vec<Node> = Vec::new();

    let result = protocol::preprocess(&[1], &mut nodes, &mut prg);
    assert!(matches!(result, Err(Error::Parameter(_))));
}

#[test]
fn preprocess_rejects_mismatched_parameters() {
    let mut prg = Prg::new(&[30]);
    let small = Params::new(
        BigUint::from(23u32),
        BigUint::from(11u32),
        BigUint::from(2u32),
    )
    .unwrap();

    let mut nodes = vec![Node::new(), Node::with_params(small)];
    let result = protocol::preprocess(&[1], &mut nodes, &mut prg);
    assert!(matches!(result, Err(Error::Parameter(_))));
}

#[test]
fn mask_inputs_rejects_incomplete_mask_maps() {
    let mut prg = Prg::new(&[31]);
    let mut nodes = make_nodes(2);
    let p = nodes[0].params().p.clone();
    protocol::preprocess(&[2], &mut nodes, &mut prg).unwrap();

    let mut inputs = HashMap::new();
    inputs.insert((0, 0), element(1, &p));
    inputs.insert((0, 1), element(2, &p));

    // One node only answered for a subset of the contributor's coordinates.
    let complete = nodes[0].masks(&[(0, 0), (0, 1)]).unwrap();
    let partial = nodes[1].masks(&[(0, 0)]).unwrap();

    let result = protocol::mask_inputs(&inputs, &[complete, partial]);
    assert!(matches!(result, Err(Error::Protocol(_))));
}
