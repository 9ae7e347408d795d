use dnsmul_core::communicator::Communicator;
use dnsmul_core::local::local_world;
use dnsmul_core::socket::SocketCommunicator;
use dnsmul_matrix::{
    multiply, place, reduce, run_local, Block, BlockPosition, FileMatrixSource, Matrix,
    MemoryMatrixSource, Operand, ProcessId, ProcessTask, RunConfiguration, RunError, SourceError,
    Topology, SUPPORTED_GRID_SIDES,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use tempfile::NamedTempFile;
use tokio::net::TcpListener;

////////////////////////////////////////////////////////////////////////////////////////////////////

async fn multiply_local(process_count: usize, left: &Matrix, right: &Matrix) -> String {
    let output = run_local(
        process_count,
        RunConfiguration::default(),
        MemoryMatrixSource::from(left),
        MemoryMatrixSource::from(right),
        Vec::new(),
    )
    .await
    .unwrap();

    String::from_utf8(output).unwrap()
}

fn sequence(size: usize) -> Matrix {
    Matrix::new(size, (1..=(size * size) as i64).collect())
}

////////////////////////////////////////////////////////////////////////////////////////////////////

#[tokio::test]
async fn identity_times_sequence() {
    let right = Matrix::from_rows([
        vec![1, 2, 3, 4],
        vec![5, 6, 7, 8],
        vec![9, 10, 11, 12],
        vec![13, 14, 15, 16],
    ]);

    assert_eq!(
        multiply_local(8, &Matrix::identity(4), &right).await,
        "1 2 3 4\n5 6 7 8\n9 10 11 12\n13 14 15 16\n"
    );
}

#[tokio::test]
async fn identity_squared_on_64_processes() {
    let identity = Matrix::identity(8);

    assert_eq!(
        multiply_local(64, &identity, &identity).await,
        identity.to_string()
    );
}

#[tokio::test]
async fn random_products() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for (process_count, size) in [(8, 2), (8, 6), (8, 16), (64, 4), (64, 12), (64, 32)] {
        let left = Matrix::random(size, -100..=100, &mut rng);
        let right = Matrix::random(size, -100..=100, &mut rng);

        assert_eq!(
            multiply_local(process_count, &left, &right).await,
            left.multiply(&right).to_string(),
            "{process_count} processes, size {size}"
        );
    }
}

#[tokio::test]
async fn output_is_repeatable() {
    let mut rng = StdRng::seed_from_u64(42);
    let left = Matrix::random(8, -1000..=1000, &mut rng);
    let right = Matrix::random(8, -1000..=1000, &mut rng);

    let first = multiply_local(64, &left, &right).await;

    for _ in 0..3 {
        assert_eq!(multiply_local(64, &left, &right).await, first);
    }
}

#[tokio::test]
async fn scalar_blocks() {
    let left = sequence(4);
    let right = Matrix::random(4, -9..=9, &mut StdRng::seed_from_u64(5));

    assert_eq!(
        multiply_local(64, &left, &right).await,
        left.multiply(&right).to_string()
    );
}

#[tokio::test]
async fn result_blocks_match_brute_force() {
    let topology = Topology::resolve(64, &SUPPORTED_GRID_SIDES).unwrap();
    let partition = topology.partition(8).unwrap();

    let mut rng = StdRng::seed_from_u64(9);
    let left = Matrix::random(8, -20..=20, &mut rng);
    let right = Matrix::random(8, -20..=20, &mut rng);
    let product = left.multiply(&right);

    let handles = local_world(64)
        .into_iter()
        .map(|mut communicator| {
            let left = MemoryMatrixSource::from(&left);
            let right = MemoryMatrixSource::from(&right);

            tokio::spawn(async move {
                let process_id = ProcessId::from(communicator.rank());
                let a = place(&left, Operand::A, &topology, &partition, process_id)
                    .await
                    .unwrap();
                let b = place(&right, Operand::B, &topology, &partition, process_id)
                    .await
                    .unwrap();

                let result = reduce(&mut communicator, &topology, &partition, multiply(&a, &b))
                    .await
                    .unwrap();

                (process_id, result)
            })
        })
        .collect::<Vec<_>>();

    let mut reduced = 0;

    for handle in handles {
        let (process_id, result) = handle.await.unwrap();
        let coordinates = topology.coordinates(process_id);

        match result {
            Some(block) => {
                assert_eq!(coordinates.k(), 0);
                assert_eq!(
                    block,
                    product.block(BlockPosition::new(coordinates.i(), coordinates.j()), 2)
                );
                reduced += 1;
            }
            None => assert_ne!(coordinates.k(), 0),
        }
    }

    assert_eq!(reduced, 16);
}

#[tokio::test]
async fn file_sources() {
    let left = sequence(4);
    let right = Matrix::identity(4);

    let mut left_file = NamedTempFile::new().unwrap();
    write!(left_file, "{}", left).unwrap();
    let mut right_file = NamedTempFile::new().unwrap();
    write!(right_file, "{}", right).unwrap();

    let output = run_local(
        8,
        RunConfiguration::default(),
        FileMatrixSource::new(left_file.path()),
        FileMatrixSource::new(right_file.path()),
        Vec::new(),
    )
    .await
    .unwrap();

    assert_eq!(String::from_utf8(output).unwrap(), left.to_string());
}

#[tokio::test]
async fn malformed_source_fails_every_process() {
    let left = MemoryMatrixSource::from(&Matrix::identity(4));
    let right = MemoryMatrixSource::from("1 2 3 4\n5 6 7 8\n9 x 11 12\n13 14 15 16\n");

    let result = run_local(8, RunConfiguration::default(), left, right, Vec::new()).await;

    assert!(matches!(
        result,
        Err(RunError::Source(SourceError::InvalidToken { row: 2, .. }))
    ));
}

#[tokio::test]
async fn recursive_local_multiply() {
    let mut rng = StdRng::seed_from_u64(3);
    let left = Matrix::random(64, -5..=5, &mut rng);
    let right = Matrix::random(64, -5..=5, &mut rng);

    let output = run_local(
        8,
        RunConfiguration::new(SUPPORTED_GRID_SIDES.to_vec(), 32),
        MemoryMatrixSource::from(&left),
        MemoryMatrixSource::from(&right),
        Vec::new(),
    )
    .await
    .unwrap();

    assert_eq!(
        String::from_utf8(output).unwrap(),
        left.multiply(&right).to_string()
    );
}

#[tokio::test]
async fn socket_world() {
    let mut rng = StdRng::seed_from_u64(11);
    let left = Matrix::random(6, -50..=50, &mut rng);
    let right = Matrix::random(6, -50..=50, &mut rng);

    let mut listeners = Vec::new();

    for _ in 0..8 {
        listeners.push(TcpListener::bind("127.0.0.1:0").await.unwrap());
    }

    let addresses = listeners
        .iter()
        .map(|listener| listener.local_addr().unwrap())
        .collect::<Vec<_>>();

    let handles = listeners
        .into_iter()
        .enumerate()
        .map(|(rank, listener)| {
            let addresses = addresses.clone();
            let left = MemoryMatrixSource::from(&left);
            let right = MemoryMatrixSource::from(&right);

            tokio::spawn(async move {
                let communicator = SocketCommunicator::from_listener(rank, listener, &addresses)
                    .await
                    .unwrap();

                ProcessTask::new(communicator, RunConfiguration::default(), left, right)
                    .run(Vec::new())
                    .await
                    .unwrap()
            })
        })
        .collect::<Vec<_>>();

    let mut outputs = Vec::new();

    for handle in handles {
        outputs.push(String::from_utf8(handle.await.unwrap()).unwrap());
    }

    assert_eq!(outputs[0], left.multiply(&right).to_string());
    assert!(outputs[1..].iter().all(String::is_empty));
}

#[test]
fn block_position_of_every_copy() {
    let topology = Topology::resolve(8, &SUPPORTED_GRID_SIDES).unwrap();

    for value in 0..8 {
        let process_id = ProcessId::from(value);
        let coordinates = topology.coordinates(process_id);

        assert_eq!(
            Operand::A.owned_block(&topology, process_id),
            BlockPosition::new(coordinates.i(), coordinates.k())
        );
        assert_eq!(
            Operand::B.owned_block(&topology, process_id),
            BlockPosition::new(coordinates.k(), coordinates.j())
        );
    }

    assert_eq!(Block::identity(1), Block::new(1, vec![1]));
}
