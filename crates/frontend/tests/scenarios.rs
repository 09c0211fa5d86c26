// Copyright 2025 Irreducible Inc.
use ark_ff::Field;
use tessera_core::{
	ConstraintSystem, GateKind, ProvingBackend, ShapeCommitmentBackend, verify::verify_witness,
};
use tessera_field::Fp;
use tessera_frontend::{CircuitBuilder, CircuitStat, Cvar, Error, Options};

fn fp(x: u64) -> Fp {
	Fp::from(x)
}

/// Fixed options, so the layout does not depend on `TESSERA_ZK_ROWS`.
fn witness_opts() -> Options {
	Options {
		witness: true,
		..Options::default()
	}
}

fn witnesses(builder: &CircuitBuilder, values: &[u64]) -> Vec<Cvar> {
	values
		.iter()
		.map(|&value| builder.exists(|| Ok(fp(value))).unwrap())
		.collect()
}

#[test]
fn test_two_term_combination_is_one_gate() {
	let builder = CircuitBuilder::with_opts(Options::default());
	let v = witnesses(&builder, &[0, 0]);
	let lc = v[0].scale(fp(3)).add(&v[1].scale(fp(5))).add(&Cvar::constant(fp(7)));
	builder.assert_equal(&lc, &Cvar::zero()).unwrap();
	let circuit = builder.build().unwrap();

	assert_eq!(circuit.n_gates(), 1);
	assert_eq!(circuit.var_counts().intermediates, 0);
}

#[test]
fn test_four_term_sum_needs_two_intermediates() {
	let builder = CircuitBuilder::with_opts(witness_opts());
	let v = witnesses(&builder, &[1, 2, 3, 4]);
	let sum = v.iter().fold(Cvar::zero(), |acc, x| &acc + x);
	builder.assert_equal(&sum, &Cvar::constant(fp(10))).unwrap();
	let circuit = builder.build().unwrap();

	assert_eq!(circuit.n_gates(), 3);
	assert_eq!(circuit.var_counts().intermediates, 2);
	circuit.verify().unwrap();

	// Both intermediates are defined (column 2) strictly before the assertion uses them.
	let cs = circuit.constraint_system();
	for gate in &cs.gates[..2] {
		assert_eq!(gate.coeffs[2], -Fp::ONE);
	}
	assert_eq!(cs.gates[2].coeffs[4], -fp(10));
}

#[test]
fn test_equality_with_public_witness() {
	let builder = CircuitBuilder::with_opts(witness_opts());
	let v = witnesses(&builder, &[3, 4]);
	builder.assert_equal(&(&v[0] + &v[1]), &Cvar::constant(fp(7))).unwrap();
	let circuit = builder.build().unwrap();

	assert_eq!(circuit.n_gates(), 1);
	circuit.verify().unwrap();

	let builder = CircuitBuilder::with_opts(witness_opts());
	let v = witnesses(&builder, &[3, 5]);
	assert!(matches!(
		builder.assert_equal(&(&v[0] + &v[1]), &Cvar::constant(fp(7))),
		Err(Error::Unsatisfied { gate_index: 0 })
	));
}

#[test]
fn test_product_and_sum_digests_differ() {
	let build = |product: bool| {
		let builder = CircuitBuilder::with_opts(Options::default());
		let v = witnesses(&builder, &[0, 0]);
		if product {
			builder.mul(&v[0], &v[1]).unwrap();
		} else {
			builder.seal(&(&v[0] + &v[1])).unwrap();
		}
		builder.build().unwrap()
	};
	let product = build(true);
	let sum = build(false);
	assert_eq!(product.n_gates(), sum.n_gates());
	assert_ne!(product.digest().unwrap(), sum.digest().unwrap());
	assert_eq!(product.digest().unwrap(), build(true).digest().unwrap());
}

#[test]
fn test_domain_size_is_padded() {
	let builder = CircuitBuilder::with_opts(Options::default());
	let v = witnesses(&builder, &[0]);
	let mut acc = v[0].clone();
	for _ in 0..5 {
		acc = builder.mul(&acc, &v[0]).unwrap();
	}
	let cs = builder.build().unwrap().into_constraint_system();
	assert_eq!(cs.n_gates(), 5);
	assert_eq!(cs.zk_rows, 3);
	assert_eq!(cs.domain_size, 8);
	cs.validate().unwrap();
}

/// `x^3 + x + 5 = out` with public `out`.
fn cubic(builder: &CircuitBuilder, x: u64) -> Result<(), Error> {
	let out = builder.add_public_input(|| Ok(fp(x * x * x + x + 5)))?;
	let x = builder.exists(|| Ok(fp(x)))?;
	let x2 = builder.square(&x)?;
	let x3 = builder.mul(&x2, &x)?;
	builder.assert_equal(&(&(&x3 + &x) + &Cvar::constant(fp(5))), &out)
}

#[test]
fn test_cubic_end_to_end() {
	let builder = CircuitBuilder::with_opts(witness_opts());
	cubic(&builder, 3).unwrap();
	let circuit = builder.build().unwrap();
	circuit.verify().unwrap();

	let witness = circuit.witness().unwrap();
	assert_eq!(witness.public_inputs, vec![fp(35)]);

	// A corrupted copy of `x` breaks a copy constraint.
	let mut rows = witness.rows.clone();
	rows[2][1] = fp(4);
	assert!(verify_witness(circuit.constraint_system(), &witness.public_inputs, &rows).is_err());

	// The constraint-mode build has the same shape.
	let shape = CircuitBuilder::with_opts(Options::default());
	cubic(&shape, 0).unwrap();
	assert_eq!(shape.build().unwrap().to_bytes().unwrap(), circuit.to_bytes().unwrap());
}

#[test]
fn test_encodings_round_trip() {
	let builder = CircuitBuilder::with_opts(Options::default());
	cubic(&builder, 0).unwrap();
	let circuit = builder.build().unwrap();
	let cs = circuit.constraint_system();

	let bytes = circuit.to_bytes().unwrap();
	assert_eq!(&ConstraintSystem::from_bytes(&bytes).unwrap(), cs);

	let json = circuit.to_json().unwrap();
	assert_eq!(&ConstraintSystem::from_json(&json).unwrap(), cs);
	assert!(json.contains(r#""type":"Generic""#));

	assert_eq!(circuit.digest_hex().unwrap(), hex_digest(&bytes));
}

fn hex_digest(bytes: &[u8]) -> String {
	use sha2::{Digest, Sha256};
	hex::encode(Sha256::digest(bytes))
}

#[test]
fn test_backend_compile() {
	let builder = CircuitBuilder::with_opts(Options::default());
	cubic(&builder, 0).unwrap();
	let circuit = builder.build().unwrap();

	let vk = circuit.compile_with(&ShapeCommitmentBackend).unwrap();
	assert_eq!(vk.backend, ShapeCommitmentBackend.name());
	assert_eq!(vk.public_input_size, 1);
	assert_eq!(vk.domain_size, circuit.constraint_system().domain_size);
	assert_eq!(vk, ShapeCommitmentBackend.compile(circuit.constraint_system()).unwrap());
}

#[test]
fn test_stat_report() {
	let builder = CircuitBuilder::with_opts(Options::default());
	cubic(&builder, 0).unwrap();
	let circuit = builder.build().unwrap();
	let stat = CircuitStat::collect(&circuit);

	assert_eq!(stat.gates_by_kind, vec![(GateKind::Generic, circuit.n_gates())]);
	assert_eq!(stat.n_public_inputs, 1);
	assert_eq!(stat.n_witness, 1);
	assert!(stat.to_string().contains("Cycles"));
	assert_eq!(stat.n_cycles, circuit.permutation_cycles().len());
}
