// Copyright Peter Bower 2025. All Rights Reserved.
// Licensed under Mozilla Public License (MPL) 2.0.

// Goodness of fit for the variate generators: the Kolmogorov-Smirnov
// statistic of a seeded sample against the family CDF must sit below the
// 0.1% critical value 1.95 / sqrt(n).

#[cfg(feature = "probability_distributions")]
mod sampling_tests {
    use stat_kernels::kernels::scientific::distributions::dist_func::beta::{p_beta, r_beta};
    use stat_kernels::kernels::scientific::distributions::dist_func::gamma::{p_gamma, r_gamma};
    use stat_kernels::kernels::scientific::distributions::dist_func::normal::{p_normal, r_normal};
    use stat_kernels::kernels::scientific::distributions::dist_func::student::{
        p_student, r_student,
    };
    use stat_kernels::kernels::scientific::distributions::shared::sampler::RandomGenerator;

    const N: usize = 4000;

    fn ks_statistic(mut sample: Vec<f64>, cdf: impl Fn(f64) -> f64) -> f64 {
        sample.sort_by(|a, b| a.total_cmp(b));
        let n = sample.len() as f64;
        sample
            .iter()
            .enumerate()
            .map(|(i, &x)| {
                let f = cdf(x);
                (f - i as f64 / n).max((i + 1) as f64 / n - f)
            })
            .fold(0.0, f64::max)
    }

    fn assert_fits(name: &str, sample: Vec<f64>, cdf: impl Fn(f64) -> f64) {
        let d = ks_statistic(sample, cdf);
        let critical = 1.95 / (N as f64).sqrt();
        assert!(d < critical, "{name}: KS statistic {d} above {critical}");
    }

    #[test]
    fn normal_ziggurat_fits() {
        let mut rng = RandomGenerator::from_seed(31);
        let sample = (0..N).map(|_| r_normal(&mut rng)).collect();
        assert_fits("normal", sample, |x| p_normal(x, false));
    }

    #[test]
    fn gamma_fits_on_both_sides_of_unit_shape() {
        let mut rng = RandomGenerator::from_seed(32);
        for k in [0.4, 2.5] {
            let sample = (0..N).map(|_| r_gamma(&mut rng, k).unwrap()).collect();
            assert_fits("gamma", sample, |x| p_gamma(k, x, false).unwrap());
        }
    }

    #[test]
    fn beta_fits_across_sampler_branches() {
        let mut rng = RandomGenerator::from_seed(33);
        for (a, b) in [(0.3, 0.4), (2.0, 5.0), (0.5, 3.0)] {
            let sample = (0..N).map(|_| r_beta(&mut rng, a, b).unwrap()).collect();
            assert_fits("beta", sample, |x| p_beta(a, b, x, false).unwrap());
        }
    }

    #[test]
    fn student_fits() {
        let mut rng = RandomGenerator::from_seed(34);
        let sample = (0..N).map(|_| r_student(&mut rng, 4.0).unwrap()).collect();
        assert_fits("student", sample, |x| p_student(4.0, x, false).unwrap());
    }
}
